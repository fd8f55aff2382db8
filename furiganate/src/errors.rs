//! エラー型の定義
//!
//! このモジュールは、furiganateで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

/// furiganate専用のResult型
///
/// エラー型としてデフォルトで[`FuriganaError`]を使用します。
pub type Result<T, E = FuriganaError> = std::result::Result<T, E>;

/// furiganateのエラー型
#[derive(Debug, thiserror::Error)]
pub enum FuriganaError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 注釈の組み立て結果が元の表層形を再構成できないエラー
    ///
    /// 内部不変条件の違反を表します。該当するテキストは変更されません。
    #[error("annotated fragment {rebuilt:?} does not reconstruct surface {surface:?}")]
    StructuralMismatch {
        /// 元の表層形
        surface: String,
        /// 注釈から組み立て直した文字列
        rebuilt: String,
    },

    /// 形態素の表層形を連結しても入力テキストに戻らないエラー
    #[error("segmenter output {segmented:?} does not cover text {text:?}")]
    SegmentationMismatch {
        /// 入力テキスト
        text: String,
        /// 表層形を連結した文字列
        segmented: String,
    },

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// シリアライズ結果のUTF-8エラー
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    /// 形態素解析器のエラー
    ///
    /// [`VibratoError`](vibrato_rkyv::errors::VibratoError)のエラーバリアント。
    #[error(transparent)]
    Vibrato(#[from] vibrato_rkyv::errors::VibratoError),
}

impl FuriganaError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn structural_mismatch<S, R>(surface: S, rebuilt: R) -> Self
    where
        S: Into<String>,
        R: Into<String>,
    {
        Self::StructuralMismatch {
            surface: surface.into(),
            rebuilt: rebuilt.into(),
        }
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}
