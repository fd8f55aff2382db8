//! 読みの正規化
//!
//! 形態素解析器は読みを片仮名で返すため、表示前に平仮名へ変換します。

/// 平仮名に対応する片仮名の範囲（ァ〜ヶ）
const KATAKANA_RANGE: std::ops::RangeInclusive<char> = '\u{30A1}'..='\u{30F6}';

/// 片仮名と平仮名のコードポイントの差
const KATAKANA_OFFSET: u32 = 0x60;

/// 片仮名1文字を平仮名に変換します。
///
/// 対応する平仮名を持たない文字（長音符「ー」、ヷ〜ヺなど）はそのまま返します。
#[inline(always)]
pub fn to_hiragana(c: char) -> char {
    if KATAKANA_RANGE.contains(&c) {
        char::from_u32(c as u32 - KATAKANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// 読みの片仮名を平仮名に変換します。
///
/// # 例
///
/// ```
/// use furiganate::reading::normalize;
///
/// assert_eq!(normalize("トウキョウ"), "とうきょう");
/// assert_eq!(normalize("ラーメン"), "らーめん");
/// ```
pub fn normalize(reading: &str) -> String {
    reading.chars().map(to_hiragana).collect()
}

/// 2つの文字が仮名として同じかどうかを返します。
///
/// 片仮名と平仮名の違いは無視されます。
#[inline(always)]
pub fn kana_eq(a: char, b: char) -> bool {
    to_hiragana(a) == to_hiragana(b)
}
