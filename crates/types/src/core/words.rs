// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Word corpus for table passphrases
//!
//! 64 adjectives and 64 nouns, resulting in 262144 distinct `adjective-noun-noun` keys.

pub(crate) const ADJECTIVES: [&str; 64] = [
    "amber", "bitter", "bold", "brave", "breezy", "bright", "brisk", "calm", "cheeky", "chilly",
    "clever", "cosy", "crisp", "crispy", "curly", "dainty", "dizzy", "eager", "fancy", "fizzy",
    "fluffy", "fresh", "frosty", "fruity", "gentle", "giant", "glad", "golden", "grand", "happy",
    "hasty", "hearty", "honest", "humble", "jolly", "juicy", "kind", "lively", "lucky", "mellow",
    "merry", "mighty", "minty", "nimble", "noble", "peppy", "plucky", "polite", "proud", "quick",
    "quiet", "rapid", "rosy", "rusty", "salty", "shiny", "silky", "smoky", "snappy", "spicy",
    "sunny", "sweet", "tangy", "zesty",
];

pub(crate) const NOUNS: [&str; 64] = [
    "apple", "bagel", "banana", "basil", "biscuit", "bowl", "bread", "brownie", "butter", "cactus",
    "candle", "carrot", "cheese", "cherry", "cocoa", "cookie", "cracker", "cumin", "donut", "dumpling",
    "falcon", "fennel", "fig", "garlic", "ginger", "grape", "honey", "kettle", "kiwi", "ladle",
    "lemon", "lentil", "mango", "maple", "melon", "muffin", "noodle", "nutmeg", "olive", "onion",
    "otter", "pancake", "papaya", "peach", "pepper", "pickle", "plate", "plum", "potato", "pretzel",
    "radish", "ravioli", "saffron", "salmon", "spoon", "sprout", "teapot", "tofu", "tomato", "truffle",
    "tulip", "waffle", "walnut", "yogurt",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn corpus_is_unique_and_url_safe() {
        for list in [&ADJECTIVES[..], &NOUNS[..]] {
            let unique: HashSet<&str> = list.iter().copied().collect();
            assert_eq!(unique.len(), list.len());

            assert!(list
                .iter()
                .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase())));
        }
    }
}
