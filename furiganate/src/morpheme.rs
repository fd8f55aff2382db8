//! 形態素の表現

/// 形態素解析器が返す形態素
///
/// 表層形と、形態素全体の読みを保持します。読みは解析器の慣例どおり
/// 片仮名のままで、表示の前に[`normalize`](crate::reading::normalize)で
/// 平仮名に変換されます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Morpheme {
    surface: String,
    reading: Option<String>,
}

impl Morpheme {
    /// 新しい形態素を作成します。
    ///
    /// # 引数
    ///
    /// * `surface` - 表層形
    /// * `reading` - 読み。解析器が読みを持たない場合は `None`
    pub fn new<S>(surface: S, reading: Option<String>) -> Self
    where
        S: Into<String>,
    {
        Self {
            surface: surface.into(),
            reading,
        }
    }

    /// 読みを持つ形態素を作成します。
    pub fn with_reading<S, R>(surface: S, reading: R) -> Self
    where
        S: Into<String>,
        R: Into<String>,
    {
        Self::new(surface, Some(reading.into()))
    }

    /// 表層形を返します。
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// 読みを返します。空文字列の読みと `None` は区別されます。
    #[inline(always)]
    pub fn reading(&self) -> Option<&str> {
        self.reading.as_deref()
    }
}
