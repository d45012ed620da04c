//! Conversions between 0-based (row, col) indexes and A1-style cell references.

/// Converts a column letter sequence (`A`, `AB`) to a 0-based index.
pub(crate) fn col_to_index(col: &str) -> Option<usize> {
    if col.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for char in col.chars() {
        if !char.is_ascii_alphabetic() {
            return None;
        }
        let digit = (char.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Converts a 1-based row number text to a 0-based index.
pub(crate) fn row_to_index(row: &str) -> Option<usize> {
    row.parse::<usize>().ok().filter(|row| *row > 0).map(|row| row - 1)
}

/// Converts a 0-based column index to letters.
pub(crate) fn index_to_col(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = String::new();
    while col > 0 {
        col -= 1;
        letters.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    letters
}

/// Converts 0-based row and column to a reference like `B3`.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}

/// Parses a reference like `B3` into 0-based (row, col).
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|char: char| char.is_ascii_digit())?;
    let (col, row) = reference.split_at(split);
    Some((row_to_index(row)?, col_to_index(col.trim_start_matches('$'))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_round_trip() {
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(2, 1), "B3");
        assert_eq!(index_to_reference(0, 25), "Z1");
        assert_eq!(index_to_reference(0, 26), "AA1");
        assert_eq!(index_to_reference(9, 701), "ZZ10");
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("AA10"), Some((9, 26)));
        assert_eq!(reference_to_index("b3"), Some((2, 1)));
    }

    #[test]
    fn invalid_references() {
        assert_eq!(reference_to_index("A"), None);
        assert_eq!(reference_to_index("10"), None);
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(reference_to_index("A-1"), None);
        assert_eq!(col_to_index(""), None);
    }
}
