//! End-to-end smoke run over the public surface.

use ahotrie::{Token, Trie};
use std::collections::HashMap;

fn main() {
    println!("Running ahotrie smoke tests...\n");

    test_multi_match();
    test_ignore_case();
    test_whole_words();
    test_no_overlaps();
    test_tokenize();
    test_replace();

    println!("\nAll smoke tests passed.");
}

fn test_multi_match() {
    let trie = Trie::builder()
        .add_keywords(["he", "she", "his", "hers"])
        .build();
    let emits = trie.parse_text("ushers");
    assert_eq!(emits.len(), 3);
    println!("multi-match: {:?}", emits);
}

fn test_ignore_case() {
    let trie = Trie::builder().add_keyword("Test").ignore_case().build();
    let emit = trie.first_match("a TEST case").expect("should match");
    assert_eq!(emit.keyword.as_ref(), "test");
    println!("ignore-case: {:?}", emit);
}

fn test_whole_words() {
    let trie = Trie::builder().add_keyword("cat").only_whole_words().build();
    assert!(!trie.contains_match("concatenate"));
    assert!(trie.contains_match("the cat sat"));
    println!("whole-words: ok");
}

fn test_no_overlaps() {
    let trie = Trie::builder()
        .add_keywords(["he", "hers"])
        .ignore_overlaps()
        .build();
    let emits = trie.parse_text("ushers");
    assert_eq!(emits.len(), 1);
    assert_eq!(emits[0].keyword.as_ref(), "hers");
    println!("no-overlaps: {:?}", emits);
}

fn test_tokenize() {
    let trie = Trie::builder().add_keywords(["fox", "dog"]).build();
    let tokens = trie.tokenize("the fox met a dog");
    let rebuilt: String = tokens.iter().map(Token::fragment).collect();
    assert_eq!(rebuilt, "the fox met a dog");
    println!("tokenize: {} tokens", tokens.len());
}

fn test_replace() {
    let trie = Trie::builder().add_keyword("foo").build();
    let mut subs = HashMap::new();
    subs.insert("foo".to_string(), "bar".to_string());
    assert_eq!(trie.replace("foofighters", &subs), "barfighters");
    println!("replace: ok");
}
