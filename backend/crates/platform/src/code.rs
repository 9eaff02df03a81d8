//! Slug and invite-code generation

use rand::{Rng, rngs::OsRng};

use crate::crypto::random_bytes;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Turn a human title into a URL slug
///
/// Lowercases, replaces runs of non-alphanumeric characters with a
/// single hyphen, and trims leading/trailing hyphens.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_hyphen = true;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            out.push('-');
            last_was_hyphen = true;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Slug with a short random suffix to avoid collisions
pub fn slugify_unique(input: &str) -> String {
    let base = slugify(input);
    let mut rng = OsRng;
    let suffix: String = (0..5)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// Generate a 6-character uppercase hex class code
///
/// Students type this to join a classroom, so it stays short. The
/// caller must retry on a unique-constraint collision.
pub fn generate_class_code() -> String {
    random_bytes(3)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect()
}

/// Generate a unique order number, e.g. `ORD-20260830-4F7A2C91`
pub fn generate_order_number(date_yyyymmdd: &str) -> String {
    let rand_part: String = random_bytes(4).iter().map(|b| format!("{:02X}", b)).collect();
    format!("ORD-{}-{}", date_yyyymmdd, rand_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust for Beginners"), "rust-for-beginners");
        assert_eq!(slugify("  C++ & Go!  "), "c-go");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_unique_suffix() {
        let slug = slugify_unique("Rust for Beginners");
        assert!(slug.starts_with("rust-for-beginners-"));
        assert_eq!(slug.len(), "rust-for-beginners-".len() + 5);

        let a = slugify_unique("Same Title");
        let b = slugify_unique("Same Title");
        assert_ne!(a, b);
    }

    #[test]
    fn test_class_code_shape() {
        let code = generate_class_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number("20260830");
        assert!(number.starts_with("ORD-20260830-"));
        assert_eq!(number.len(), "ORD-20260830-".len() + 8);
    }
}
