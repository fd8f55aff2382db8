//! 注釈付き断片とルビのマークアップ
//!
//! 1つの形態素に対する注釈結果を[`Fragment`]として保持し、
//! `<ruby><rb>…</rb><rt>…</rt></ruby>` 形式のマークアップに変換します。

use crate::distributor::Strategy;
use crate::errors::{FuriganaError, Result};

/// 断片を構成する要素
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// 注釈なしでそのまま出力される文字列
    Plain(String),
    /// ルビ
    Ruby {
        /// 親文字（漢字の連続区間）
        base: String,
        /// 振り仮名
        reading: String,
    },
}

impl Segment {
    /// 元のテキストに現れる文字列を返します。
    ///
    /// ルビの場合は親文字です。
    pub fn base(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Ruby { base, .. } => base,
        }
    }

    /// マークアップを `out` に書き出します。
    pub fn write_markup(&self, out: &mut String) {
        match self {
            Self::Plain(text) => escape_into(out, text),
            Self::Ruby { base, reading } => {
                out.push_str("<ruby><rb>");
                escape_into(out, base);
                out.push_str("</rb><rt>");
                escape_into(out, reading);
                out.push_str("</rt></ruby>");
            }
        }
    }
}

/// 1つの形態素に対する注釈結果
///
/// 要素の列に加えて、読みの配分に使われた方式と、
/// その配分が近似であるかどうかを保持します。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    segments: Vec<Segment>,
    strategy: Strategy,
    approximate: bool,
}

impl Fragment {
    pub(crate) fn new(strategy: Strategy, approximate: bool) -> Self {
        Self {
            segments: vec![],
            strategy,
            approximate,
        }
    }

    /// 注釈を付けずに表層形をそのまま保持する断片を作成します。
    pub(crate) fn passthrough(surface: &str, strategy: Strategy) -> Self {
        let mut fragment = Self::new(strategy, false);
        if !surface.is_empty() {
            fragment.segments.push(Segment::Plain(surface.to_string()));
        }
        fragment
    }

    /// 1文字を注釈なしで追加します。直前が注釈なしの要素なら連結します。
    pub(crate) fn push_plain(&mut self, c: char) {
        if let Some(Segment::Plain(text)) = self.segments.last_mut() {
            text.push(c);
        } else {
            self.segments.push(Segment::Plain(c.to_string()));
        }
    }

    pub(crate) fn push_ruby(&mut self, base: String, reading: String) {
        self.segments.push(Segment::Ruby { base, reading });
    }

    /// 要素の列を返します。
    #[inline(always)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 読みの配分に使われた方式を返します。
    #[inline(always)]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// 読みの境界が近似（比例配分）で決められたかどうかを返します。
    #[inline(always)]
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }

    /// ルビを1つ以上含むかどうかを返します。
    pub fn has_ruby(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Ruby { .. }))
    }

    /// ルビを取り除いた文字列を返します。
    ///
    /// 正しく組み立てられた断片では、元の表層形と一致します。
    pub fn base_text(&self) -> String {
        self.segments.iter().map(Segment::base).collect()
    }

    /// 振り仮名を順に連結した文字列を返します。
    pub fn readings(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Ruby { reading, .. } => Some(reading.as_str()),
                Segment::Plain(_) => None,
            })
            .collect()
    }

    /// 断片が `surface` を再構成することを検証します。
    pub(crate) fn verify(&self, surface: &str) -> Result<()> {
        let rebuilt = self.base_text();
        if rebuilt == surface {
            Ok(())
        } else {
            Err(FuriganaError::structural_mismatch(surface, rebuilt))
        }
    }

    /// マークアップを `out` に書き出します。
    pub fn write_markup(&self, out: &mut String) {
        for segment in &self.segments {
            segment.write_markup(out);
        }
    }

    /// マークアップを返します。
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

/// テキストをHTMLの文字データとしてエスケープして `out` に追加します。
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
