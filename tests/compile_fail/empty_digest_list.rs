// ABOUTME: Compile-fail test verifying a tag state cannot hold a plain Vec of digests.
// ABOUTME: The managed digest list is NonEmpty, so an empty list is unrepresentable.

use tagkeep::tag::TagState;
use tagkeep::types::{Digest, TagName};

fn main() {
    let name = TagName::parse("library/nginx").unwrap();
    let digest = Digest::parse("sha256:aaa").unwrap();
    let _state = TagState {
        id: None,
        full_image_name: name.full_image_name(&digest),
        name,
        pull_triggers: Default::default(),
        labels: Default::default(),
        latest: digest,
        all: Vec::new(), // ERROR: expected NonEmpty<Digest>, found Vec<_>
    };
}
