//! # furiganate
//!
//! 日本語のHTMLに振り仮名（ルビ）を付けるライブラリです。
//!
//! ## 概要
//!
//! HTML文書を走査して各テキストノードを形態素解析し、形態素の読みを
//! 表層形の漢字の連続区間ごとに配分して `<ruby><rb>…</rb><rt>…</rt></ruby>`
//! 形式のマークアップを差し込みます。形態素解析には [vibrato-rkyv] を使います。
//!
//! ## 主な機能
//!
//! - **読みの配分**: 送り仮名などを手がかりに、形態素全体の読みを漢字ごとに割り当てる
//! - **HTMLの走査**: 既存のルビやスクリプトを避けてテキストノードだけを書き換える
//! - **冪等性**: 出力を再度処理しても変化しない
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use furiganate::{Annotator, DocumentWalker, Morpheme};
//!
//! // 実際には VibratoSegmenter::open("system.dic.zst")? などを使います。
//! let segmenter = |_: &str| -> furiganate::errors::Result<Vec<Morpheme>> {
//!     Ok(vec![
//!         Morpheme::with_reading("男の子", "オトコノコ"),
//!         Morpheme::with_reading("が", "ガ"),
//!         Morpheme::with_reading("食べる", "タベル"),
//!     ])
//! };
//!
//! let mut walker = DocumentWalker::new(Annotator::new(segmenter));
//! let html = walker.process("<p>男の子が食べる</p>")?;
//! assert_eq!(
//!     html,
//!     "<p><ruby><rb>男</rb><rt>おとこ</rt></ruby>の<ruby><rb>子</rb><rt>こ</rt></ruby>\
//!      が<ruby><rb>食</rb><rt>た</rt></ruby>べる</p>",
//! );
//! # Ok(())
//! # }
//! ```
//!
//! [vibrato-rkyv]: https://github.com/stellanomia/vibrato-rkyv

/// テキストへの振り仮名付け
pub mod annotator;

/// 文字種の判定
pub mod character;

/// 読みの配分
pub mod distributor;

/// エラー型の定義
pub mod errors;

/// 注釈付き断片とルビのマークアップ
pub mod fragment;

/// 形態素の表現
pub mod morpheme;

/// 読みの正規化
pub mod reading;

/// 形態素解析器とのインターフェース
pub mod segmenter;

/// HTML文書の走査
pub mod walker;


// Re-exports
pub use annotator::{AnnotationStats, Annotator};
pub use distributor::{distribute, Strategy};
pub use fragment::{Fragment, Segment};
pub use morpheme::Morpheme;
pub use segmenter::{FeatureLayout, Segmenter, VibratoSegmenter};
pub use walker::{DocumentWalker, WalkStats};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
