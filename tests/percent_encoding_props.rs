// crates.io
use proptest::prelude::*;
// self
use journey_publish::oauth1::{self, OAuthParams};

proptest! {
	#[test]
	fn encoding_is_reversible(input in any::<String>()) {
		let encoded = oauth1::percent_encode(&input);

		prop_assert_eq!(oauth1::percent_decode(&encoded), Some(input));
	}

	#[test]
	fn encoded_output_uses_only_unreserved_octets(input in any::<String>()) {
		let encoded = oauth1::percent_encode(&input);

		prop_assert!(encoded.bytes().all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)));
		prop_assert!(!encoded.contains(['!', '\'', '(', ')', '*', ' ', '+']));
	}

	#[test]
	fn escapes_are_uppercase_hex(input in "[ -~]{0,32}") {
		let encoded = oauth1::percent_encode(&input);

		for escape in encoded.split('%').skip(1) {
			let hex = &escape[..2];

			prop_assert!(hex.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
		}
	}

	#[test]
	fn signature_ignores_insertion_order(
		pairs in prop::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,16}", 0..8),
	) {
		let forward = pairs.iter().collect::<OAuthParams>();
		let reversed = pairs.iter().rev().collect::<OAuthParams>();
		let sign = |params: &OAuthParams| {
			oauth1::sign("GET", "https://example.com/r", params, "cs", "ts")
		};

		prop_assert_eq!(sign(&forward), sign(&reversed));
	}
}
