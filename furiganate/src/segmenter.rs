//! 形態素解析器とのインターフェース
//!
//! テキストを形態素列に分割する機能を [`Segmenter`] トレイトとして抽象化します。
//! 通常は vibrato-rkyv を使う [`VibratoSegmenter`] を使用し、テストでは
//! クロージャを偽の解析器として渡すことができます。

use std::path::Path;

use csv_core::ReadFieldResult;
use vibrato_rkyv::tokenizer::worker::Worker;
use vibrato_rkyv::{CacheStrategy, Dictionary, LoadMode, Tokenizer};

use crate::errors::{FuriganaError, Result};
use crate::morpheme::Morpheme;

/// テキストを形態素列に分割する機能
///
/// 同じ入力には同じ結果を返す必要があります。形態素の表層形を連結すると
/// 入力テキストと一致しなければなりません。
///
/// 解析器は再入可能とは限らないため、`segment` は `&mut self` を取ります。
pub trait Segmenter {
    /// テキストを形態素列に分割します。
    fn segment(&mut self, text: &str) -> Result<Vec<Morpheme>>;
}

impl<F> Segmenter for F
where
    F: FnMut(&str) -> Result<Vec<Morpheme>>,
{
    fn segment(&mut self, text: &str) -> Result<Vec<Morpheme>> {
        self(text)
    }
}

/// 素性文字列のどの項目が読みかを表す設定
///
/// 既定値はIPADICの形式（`品詞,品詞細分類1,…,原形,読み,発音`）で、
/// 読みは8番目（インデックス7）、読み不明は `*` です。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    reading_field: usize,
    unknown_reading: String,
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self {
            reading_field: 7,
            unknown_reading: crate::distributor::UNKNOWN_READING.to_string(),
        }
    }
}

impl FeatureLayout {
    /// 新しい設定を作成します。
    ///
    /// # 引数
    ///
    /// * `reading_field` - 読みの項目のインデックス（0始まり）
    /// * `unknown_reading` - 読み不明を表す値
    pub fn new<S>(reading_field: usize, unknown_reading: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            reading_field,
            unknown_reading: unknown_reading.into(),
        }
    }

    /// 素性文字列から読みを取り出します。
    ///
    /// 項目が存在しない場合、または読み不明を表す値の場合は `None` を返します。
    ///
    /// # 例
    ///
    /// ```
    /// use furiganate::segmenter::FeatureLayout;
    ///
    /// let layout = FeatureLayout::default();
    /// let feature = "動詞,自立,*,*,一段,基本形,食べる,タベル,タベル";
    /// assert_eq!(layout.reading(feature).as_deref(), Some("タベル"));
    /// assert_eq!(layout.reading("名詞,一般,*,*,*,*,*"), None);
    /// ```
    pub fn reading(&self, feature: &str) -> Option<String> {
        split_feature(feature)
            .into_iter()
            .nth(self.reading_field)
            .filter(|reading| *reading != self.unknown_reading)
    }
}

/// CSV形式の素性文字列を項目に分割します。
///
/// ダブルクォートで囲まれた項目の中のカンマも正しく扱います。
fn split_feature(feature: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = feature.as_bytes();
    let mut output = [0; 1024];
    let mut field = vec![];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        field.extend_from_slice(&output[..nout]);
        bytes = &bytes[nin..];
        let end = match result {
            ReadFieldResult::OutputFull => continue,
            ReadFieldResult::Field { record_end } => record_end,
            ReadFieldResult::InputEmpty | ReadFieldResult::End => true,
        };
        fields.push(String::from_utf8_lossy(&field).into_owned());
        field.clear();
        if end {
            break;
        }
    }
    fields
}

/// vibrato-rkyv による形態素解析器
///
/// トークナイザーから作成したワーカーを1つ保持します。ワーカーは共有されないため、
/// 複数のスレッドで解析する場合はスレッドごとに [`VibratoSegmenter`] を作成してください。
/// 辞書は [`Tokenizer`] の内部で共有されます。
pub struct VibratoSegmenter {
    worker: Worker,
    layout: FeatureLayout,
}

impl VibratoSegmenter {
    /// トークナイザーから新しい解析器を作成します。
    pub fn new(tokenizer: &Tokenizer) -> Self {
        Self {
            worker: tokenizer.new_worker(),
            layout: FeatureLayout::default(),
        }
    }

    /// 辞書ファイルを読み込んで解析器を作成します。
    ///
    /// 拡張子が `zst` のファイルはZstandard圧縮辞書として
    /// グローバルキャッシュを使って展開し、それ以外は検証付きで直接読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - システム辞書のパス
    ///
    /// # エラー
    ///
    /// パスがディレクトリの場合、または辞書の読み込みに失敗した場合にエラーを返します。
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(FuriganaError::invalid_argument(
                "path",
                format!("{} is a directory, but a dictionary file was expected", path.display()),
            ));
        }

        log::info!("Loading the dictionary from {}", path.display());
        let dict = if path.extension().is_some_and(|ext| ext == "zst") {
            Dictionary::from_zstd(path, CacheStrategy::GlobalCache)?
        } else {
            Dictionary::from_path(path, LoadMode::Validate)?
        };
        Ok(Self::new(&Tokenizer::new(dict)))
    }

    /// 素性文字列の形式を設定します。
    pub fn layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Segmenter for VibratoSegmenter {
    fn segment(&mut self, text: &str) -> Result<Vec<Morpheme>> {
        self.worker.reset_sentence(text);
        self.worker.tokenize();
        let morphemes = self
            .worker
            .token_iter()
            .map(|token| Morpheme::new(token.surface(), self.layout.reading(token.feature())))
            .collect();
        Ok(morphemes)
    }
}
