//! テキストへの振り仮名付け
//!
//! 1つのテキストを形態素解析し、各形態素の注釈付き断片を連結して
//! ルビ付きのマークアップを作成します。

use std::borrow::Cow;

use crate::character::contains_kanji;
use crate::distributor::{distribute, Strategy};
use crate::errors::{FuriganaError, Result};
use crate::fragment::Fragment;
use crate::reading::normalize;
use crate::segmenter::Segmenter;

/// 注釈処理の統計
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    /// 処理した形態素の数
    pub morphemes: usize,
    /// ルビを付けた形態素の数
    pub annotated: usize,
    /// 漢字を含むが読みがなかった形態素の数
    pub unread: usize,
    /// 読みの境界が近似になった形態素の数
    pub approximate: usize,
}

impl AnnotationStats {
    fn record(&mut self, fragment: &Fragment) {
        self.morphemes += 1;
        if fragment.has_ruby() {
            self.annotated += 1;
        }
        if fragment.strategy() == Strategy::Unread {
            self.unread += 1;
        }
        if fragment.is_approximate() {
            self.approximate += 1;
        }
    }

    fn merge(&mut self, other: &Self) {
        self.morphemes += other.morphemes;
        self.annotated += other.annotated;
        self.unread += other.unread;
        self.approximate += other.approximate;
    }
}

/// テキストに振り仮名を付ける注釈器
///
/// 形態素解析器を所有し、テキストごとに1回だけ呼び出します。
///
/// # 例
///
/// ```
/// use furiganate::{Annotator, Morpheme};
///
/// let mut annotator = Annotator::new(|_: &str| -> furiganate::errors::Result<Vec<Morpheme>> {
///     Ok(vec![
///         Morpheme::with_reading("猫", "ネコ"),
///         Morpheme::with_reading("が", "ガ"),
///     ])
/// });
/// let markup = annotator.annotate("猫が")?;
/// assert_eq!(markup, "<ruby><rb>猫</rb><rt>ねこ</rt></ruby>が");
/// # Ok::<(), furiganate::errors::FuriganaError>(())
/// ```
pub struct Annotator<S> {
    segmenter: S,
    stats: AnnotationStats,
}

impl<S> Annotator<S>
where
    S: Segmenter,
{
    /// 新しい注釈器を作成します。
    pub fn new(segmenter: S) -> Self {
        Self {
            segmenter,
            stats: AnnotationStats::default(),
        }
    }

    /// テキストを形態素ごとの注釈付き断片に変換します。
    ///
    /// # エラー
    ///
    /// 形態素解析に失敗した場合、形態素の表層形がテキストを再構成しない場合、
    /// または断片の組み立てに失敗した場合にエラーを返します。
    /// エラーの場合、統計は更新されません。
    pub fn annotate_fragments(&mut self, text: &str) -> Result<Vec<Fragment>> {
        let morphemes = self.segmenter.segment(text)?;

        let segmented: String = morphemes.iter().map(|m| m.surface()).collect();
        if segmented != text {
            return Err(FuriganaError::SegmentationMismatch {
                text: text.to_string(),
                segmented,
            });
        }

        let mut stats = AnnotationStats::default();
        let mut fragments = Vec::with_capacity(morphemes.len());
        for morpheme in &morphemes {
            let reading = morpheme.reading().map(normalize);
            let fragment = distribute(morpheme.surface(), reading.as_deref())?;
            stats.record(&fragment);
            fragments.push(fragment);
        }
        self.stats.merge(&stats);
        Ok(fragments)
    }

    /// テキストをルビ付きのマークアップに変換します。
    ///
    /// 空白のみのテキストや漢字を含まないテキストは、解析器を呼ばずに
    /// そのまま返します。ルビが1つも付かなかったテキストもそのまま返します。
    /// それ以外のテキストでは、ルビ以外の文字もHTMLとしてエスケープされます。
    pub fn annotate<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>> {
        if text.trim().is_empty() || !contains_kanji(text) {
            return Ok(Cow::Borrowed(text));
        }
        let fragments = self.annotate_fragments(text)?;
        if !fragments.iter().any(Fragment::has_ruby) {
            return Ok(Cow::Borrowed(text));
        }
        let mut markup = String::with_capacity(text.len() * 2);
        for fragment in &fragments {
            fragment.write_markup(&mut markup);
        }
        Ok(Cow::Owned(markup))
    }

    /// これまでの統計を返します。
    #[inline(always)]
    pub fn stats(&self) -> AnnotationStats {
        self.stats
    }

    /// 形態素解析器への参照を返します。
    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }
}
