// ABOUTME: Compile-fail test verifying SecretId and TagId are not interchangeable.
// ABOUTME: This test should fail to compile, validating type safety.

use tagkeep::types::{SecretId, TagId};

fn takes_secret_id(_id: SecretId) {}

fn main() {
    let tag_id = TagId::new("library/nginx");
    takes_secret_id(tag_id); // ERROR: expected SecretId, found TagId
}
