//! 文字種の判定
//!
//! 表層形の各文字を漢字・仮名・その他に分類します。
//! 分類結果は保存されず、必要なときに都度計算されます。

use std::ops::Range;

/// 文字種
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// CJK統合漢字（U+4E00〜U+9FFF）
    Kanji,
    /// 平仮名・片仮名（U+3040〜U+30FF）
    Kana,
    /// 句読点、ラテン文字、数字、記号など
    Other,
}

impl CharClass {
    /// 文字を分類します。
    #[inline(always)]
    pub fn of(c: char) -> Self {
        if is_kanji(c) {
            Self::Kanji
        } else if is_kana(c) {
            Self::Kana
        } else {
            Self::Other
        }
    }
}

/// 文字を分類します。[`CharClass::of`]と同じです。
#[inline(always)]
pub fn classify(c: char) -> CharClass {
    CharClass::of(c)
}

/// 文字が漢字かどうかを返します。
#[inline(always)]
pub fn is_kanji(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}')
}

/// 文字が仮名かどうかを返します。
///
/// 漢字の範囲とは重ならないため、範囲の判定だけで十分です。
#[inline(always)]
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}')
}

/// 文字列が漢字を1文字以上含むかどうかを返します。
pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// 文字列中の漢字連続区間（文字インデックス）を左から順に返します。
///
/// 各区間は極大であり、互いに重なりません。
///
/// # 例
///
/// ```
/// use furiganate::character::kanji_runs;
///
/// let chars: Vec<char> = "男の子".chars().collect();
/// assert_eq!(kanji_runs(&chars), vec![0..1, 2..3]);
/// ```
pub fn kanji_runs(chars: &[char]) -> Vec<Range<usize>> {
    let mut runs = vec![];
    let mut start = None;
    for (i, &c) in chars.iter().enumerate() {
        match (is_kanji(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..chars.len());
    }
    runs
}
