pub mod time;

/// Alphabet used for generated ids; lowercase so ids read well in stage identifiers.
const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// short random id, used for node ids and connection id suffixes
pub fn shortid() -> String {
    nanoid::nanoid!(8, &ID_ALPHABET)
}

/// long random id, used for test result ids
pub fn longid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shortid_alphabet() {
        let id = shortid();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_ne!(shortid(), shortid());
    }
}
