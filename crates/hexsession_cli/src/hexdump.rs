//! Classic offset / hex / ASCII rendering of a page.

const ROW: usize = 16;

#[must_use]
pub fn format_row(offset: u64, data: &[u8]) -> String {
    let mut hex = String::with_capacity(ROW * 3 + 1);
    for index in 0..ROW {
        match data.get(index) {
            Some(byte) => hex.push_str(&format!("{byte:02X} ")),
            None => hex.push_str("   "),
        }
        if index == 7 {
            hex.push(' ');
        }
    }

    let ascii: String = data
        .iter()
        .map(|&byte| {
            if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            }
        })
        .collect();

    format!("{offset:08X}  {hex} |{ascii:<width$}|", width = ROW)
}

#[must_use]
pub fn format_page(base_offset: u64, data: &[u8]) -> Vec<String> {
    data.chunks(ROW)
        .enumerate()
        .map(|(index, row)| format_row(base_offset + (index * ROW) as u64, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{format_page, format_row};

    #[test]
    fn full_row() {
        let data: Vec<u8> = (0x41..0x51).collect();
        assert_eq!(
            format_row(0x10, &data),
            "00000010  41 42 43 44 45 46 47 48  49 4A 4B 4C 4D 4E 4F 50  |ABCDEFGHIJKLMNOP|"
        );
    }

    #[test]
    fn partial_row_is_padded() {
        assert_eq!(
            format_row(0, &[0x00, 0x7F, b'a']),
            format!("00000000  00 7F 61 {} {} |..a{}|", "   ".repeat(5), "   ".repeat(8), " ".repeat(13))
        );
    }

    #[test]
    fn page_rows_carry_absolute_offsets() {
        let rows = format_page(0x100, &[0u8; 20]);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("00000110"));
    }
}
