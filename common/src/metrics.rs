//! 帳票フォント（DejaVu Sans）の文字幅と折り返し
//!
//! 幅は `assets/fonts` の TTF の hmtx から取った値（2048 units/em）。
//! Latin-1 の範囲と一部の記号を持つ。それ以外の文字は数字の幅で近似する。

use crate::layout::PT_TO_MM;

pub const UNITS_PER_EM: u16 = 2048;

/// 表の先頭の文字（U+0020）
const TABLE_START: u32 = 0x20;

/// U+0020..=U+00FF。0 は制御文字。
const DEJAVU_SANS: [u16; 224] = [
    651, 821, 942, 1716, 1303, 1946, 1597, 563, 799, 799, 1024, 1716, 651, 739, 651, 690, // U+0020
    1303, 1303, 1303, 1303, 1303, 1303, 1303, 1303, 1303, 1303, 690, 690, 1716, 1716, 1716, 1087, // U+0030
    2048, 1401, 1405, 1430, 1577, 1294, 1178, 1587, 1540, 604, 604, 1343, 1141, 1767, 1532, 1612, // U+0040
    1235, 1612, 1423, 1300, 1251, 1499, 1401, 2025, 1403, 1251, 1403, 799, 690, 799, 1716, 1024, // U+0050
    1024, 1255, 1300, 1126, 1300, 1260, 721, 1300, 1298, 569, 569, 1186, 569, 1995, 1298, 1253, // U+0060
    1300, 1300, 842, 1067, 803, 1298, 1212, 1675, 1212, 1212, 1075, 1303, 690, 1303, 1716, 0, // U+0070
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // U+0080
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // U+0090
    651, 821, 1303, 1303, 1303, 1303, 690, 1024, 1024, 2048, 965, 1253, 1716, 739, 2048, 1024, // U+00A0
    1024, 1716, 821, 821, 1024, 1303, 1303, 651, 1024, 821, 965, 1253, 1985, 1985, 1985, 1087, // U+00B0
    1401, 1401, 1401, 1401, 1401, 1401, 1995, 1430, 1294, 1294, 1294, 1294, 604, 604, 604, 604, // U+00C0
    1587, 1532, 1612, 1612, 1612, 1612, 1612, 1716, 1612, 1499, 1499, 1499, 1499, 1251, 1239, 1290, // U+00D0
    1255, 1255, 1255, 1255, 1255, 1255, 2011, 1126, 1260, 1260, 1260, 1260, 569, 569, 569, 569, // U+00E0
    1253, 1298, 1253, 1253, 1253, 1253, 1253, 1716, 1253, 1298, 1298, 1298, 1298, 1212, 1300, 1212, // U+00F0
];

const DEJAVU_SANS_BOLD: [u16; 224] = [
    713, 934, 1067, 1716, 1425, 2052, 1786, 627, 936, 936, 1071, 1716, 778, 850, 778, 748, // U+0020
    1425, 1425, 1425, 1425, 1425, 1425, 1425, 1425, 1425, 1425, 819, 819, 1716, 1716, 1716, 1188, // U+0030
    2048, 1585, 1561, 1503, 1700, 1399, 1399, 1681, 1714, 762, 762, 1587, 1305, 2038, 1714, 1741, // U+0040
    1501, 1741, 1577, 1475, 1397, 1663, 1585, 2259, 1579, 1483, 1485, 936, 748, 936, 1716, 1024, // U+0050
    1024, 1382, 1466, 1214, 1466, 1389, 891, 1466, 1458, 702, 702, 1362, 702, 2134, 1458, 1407, // U+0060
    1466, 1466, 1010, 1219, 979, 1458, 1335, 1892, 1321, 1335, 1192, 1458, 748, 1458, 1716, 0, // U+0070
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // U+0080
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // U+0090
    713, 934, 1425, 1425, 1303, 1425, 748, 1024, 1024, 2048, 1155, 1323, 1716, 850, 2048, 1024, // U+00A0
    1024, 1716, 897, 897, 1024, 1507, 1303, 778, 1024, 897, 1155, 1323, 2120, 2120, 2120, 1188, // U+00B0
    1585, 1585, 1585, 1585, 1585, 1585, 2222, 1503, 1399, 1399, 1399, 1399, 762, 762, 762, 762, // U+00C0
    1716, 1714, 1741, 1741, 1741, 1741, 1741, 1716, 1741, 1663, 1663, 1663, 1663, 1483, 1511, 1473, // U+00D0
    1382, 1382, 1382, 1382, 1382, 1382, 2146, 1214, 1389, 1389, 1389, 1389, 702, 702, 702, 702, // U+00E0
    1407, 1458, 1407, 1407, 1407, 1407, 1407, 1716, 1407, 1458, 1458, 1458, 1458, 1335, 1466, 1335, // U+00F0
];

/// 表の外でよく出る記号（通常, 太字）
const PUNCTUATION: [(char, u16, u16); 9] = [
    ('\u{2013}', 1024, 1024),
    ('\u{2014}', 2048, 2048),
    ('\u{2018}', 651, 778),
    ('\u{2019}', 651, 778),
    ('\u{201c}', 1061, 1346),
    ('\u{201d}', 1061, 1346),
    ('\u{2022}', 1208, 1309),
    ('\u{2026}', 2048, 2048),
    ('\u{20ac}', 1303, 1425),
];

/// 1文字の送り幅（font units）
pub fn char_advance(c: char, bold: bool) -> u16 {
    let table = if bold { &DEJAVU_SANS_BOLD } else { &DEJAVU_SANS };
    let code = c as u32;
    let width = code
        .checked_sub(TABLE_START)
        .and_then(|i| table.get(i as usize))
        .copied()
        .or_else(|| {
            PUNCTUATION
                .iter()
                .find(|(p, _, _)| *p == c)
                .map(|&(_, regular, heavy)| if bold { heavy } else { regular })
        })
        .unwrap_or(0);

    if width == 0 {
        // 数字の幅
        table[('0' as u32 - TABLE_START) as usize]
    } else {
        width
    }
}

fn units_to_mm(units: u32, font_size_pt: f32) -> f32 {
    units as f32 / UNITS_PER_EM as f32 * font_size_pt * PT_TO_MM
}

/// 文字列幅（mm）
pub fn text_width_mm(text: &str, font_size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_advance(c, bold) as u32).sum();
    units_to_mm(units, font_size_pt)
}

/// 指定幅に収まるよう折り返す
///
/// 空白で区切り、1語で幅を超える場合は文字単位で分割する。
/// 改行はそのまま段落の区切り。空文字列でも1行を返す。
pub fn wrap_text(text: &str, font_size_pt: f32, bold: bool, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let space = text_width_mm(" ", font_size_pt, bold);

    for paragraph in text.replace('\r', "").split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = text_width_mm(word, font_size_pt, bold);

            if current.is_empty() {
                if word_width <= max_width_mm {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    let (mut pieces, rest, rest_width) =
                        split_long_word(word, font_size_pt, bold, max_width_mm);
                    lines.append(&mut pieces);
                    current = rest;
                    current_width = rest_width;
                }
                continue;
            }

            if current_width + space + word_width <= max_width_mm {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                if word_width <= max_width_mm {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    let (mut pieces, rest, rest_width) =
                        split_long_word(word, font_size_pt, bold, max_width_mm);
                    lines.append(&mut pieces);
                    current = rest;
                    current_width = rest_width;
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// 1語を幅ごとに分割（最後の断片は続きの行に使う）
fn split_long_word(
    word: &str,
    font_size_pt: f32,
    bold: bool,
    max_width_mm: f32,
) -> (Vec<String>, String, f32) {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let w = units_to_mm(char_advance(c, bold) as u32, font_size_pt);
        if !current.is_empty() && width + w > max_width_mm {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }

    (pieces, current, width)
}
