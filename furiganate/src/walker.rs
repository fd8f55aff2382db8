//! HTML文書の走査
//!
//! 文書木を文書順・深さ優先で走査し、対象となるテキストノードに振り仮名を付け、
//! 生成したマークアップをノードとして元の位置に差し込みます。
//! 既存のルビの部分木は変更しないため、出力を再度処理しても変化しません。

use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{NodeData, NodeRef};

use crate::annotator::{AnnotationStats, Annotator};
use crate::errors::Result;
use crate::segmenter::Segmenter;

/// ルビの親文字・ルビ文字の役割を持つ要素
const RUBY_ROLES: &[&str] = &["rb", "rt", "rtc", "rp"];

/// 既定で走査しない要素
const DEFAULT_SKIP_ELEMENTS: &[&str] = &["script", "style", "textarea", "title", "template", "noscript"];

/// 走査時のノードの分類
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    /// 既存のルビ。降りずに変更もしない
    RubyContainer,
    /// 振り仮名を付けるテキスト
    TextLeaf,
    /// 子を走査する要素・文書
    ElementWithChildren,
    /// コメント、文書型宣言、スクリプトなど
    Opaque,
}

/// 走査の統計
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// 注釈器に渡したテキストノードの数
    pub text_nodes: usize,
    /// マークアップで置き換えたテキストノードの数
    pub replaced: usize,
    /// 注釈に失敗して変更しなかったテキストノードの数
    pub failed: usize,
}

/// 入力の解析方法
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseMode {
    /// `<html>` などを含む完全な文書
    Document,
    /// `<body>` の中身として扱う断片
    Fragment,
}

impl ParseMode {
    /// 先頭の空白とコメントを除いた入力が文書型宣言か `<html>`・`<head>`・`<body>`
    /// の開始タグで始まる場合に、完全な文書とみなします。
    fn detect(html: &str) -> Self {
        let mut rest = html.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        while let Some(comment) = rest.strip_prefix("<!--") {
            let Some(end) = comment.find("-->") else {
                return Self::Fragment;
            };
            rest = comment[end + 3..].trim_start();
        }
        if starts_with_ignore_case(rest, "<!doctype")
            || ["html", "head", "body"].iter().any(|name| starts_with_tag(rest, name))
        {
            Self::Document
        } else {
            Self::Fragment
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// `text` が `name` 要素の開始タグで始まるかを判定します。
fn starts_with_tag(text: &str, name: &str) -> bool {
    let Some(rest) = text.strip_prefix('<') else {
        return false;
    };
    if !starts_with_ignore_case(rest, name) {
        return false;
    }
    rest[name.len()..]
        .chars()
        .next()
        .map_or(true, |c| c == '>' || c == '/' || c.is_ascii_whitespace())
}

/// HTML文書に振り仮名を付ける走査器
///
/// # 例
///
/// ```
/// use furiganate::{Annotator, DocumentWalker, Morpheme};
///
/// let segmenter = |text: &str| -> furiganate::errors::Result<Vec<Morpheme>> {
///     Ok(vec![Morpheme::with_reading(text, "ヤマ")])
/// };
/// let mut walker = DocumentWalker::new(Annotator::new(segmenter));
/// let html = walker.process("<p>山</p>")?;
/// assert_eq!(html, "<p><ruby><rb>山</rb><rt>やま</rt></ruby></p>");
/// # Ok::<(), furiganate::errors::FuriganaError>(())
/// ```
pub struct DocumentWalker<S> {
    annotator: Annotator<S>,
    skip_elements: Vec<String>,
    stats: WalkStats,
}

impl<S> DocumentWalker<S>
where
    S: Segmenter,
{
    /// 新しい走査器を作成します。
    pub fn new(annotator: Annotator<S>) -> Self {
        Self {
            annotator,
            skip_elements: DEFAULT_SKIP_ELEMENTS.iter().map(|name| name.to_string()).collect(),
            stats: WalkStats::default(),
        }
    }

    /// 走査しない要素を追加します。
    ///
    /// # 引数
    ///
    /// * `name` - 要素名（大文字・小文字は区別しません）
    pub fn skip_element<N>(mut self, name: N) -> Self
    where
        N: AsRef<str>,
    {
        let name = name.as_ref().to_ascii_lowercase();
        if !self.skip_elements.contains(&name) {
            self.skip_elements.push(name);
        }
        self
    }

    /// HTMLを処理し、振り仮名を付けたHTMLを返します。
    ///
    /// `<html>`・`<body>`・文書型宣言を含む入力は完全な文書として、
    /// それ以外は `<body>` の中身の断片として解析・出力します。
    ///
    /// # エラー
    ///
    /// シリアライズに失敗した場合にエラーを返します。個々のテキストノードの
    /// 注釈の失敗はエラーにならず、ログに記録されてそのノードが残されます。
    pub fn process(&mut self, html: &str) -> Result<String> {
        let mut out = vec![];
        match ParseMode::detect(html) {
            ParseMode::Document => {
                let document = kuchikikiki::parse_html().one(html);
                self.walk(&document);
                document.serialize(&mut out)?;
            }
            ParseMode::Fragment => {
                let body = parse_body(html);
                self.walk(&body);
                for child in body.children() {
                    child.serialize(&mut out)?;
                }
            }
        }
        Ok(String::from_utf8(out)?)
    }

    /// ノード以下を走査し、テキストノードに振り仮名を付けます。
    pub fn walk(&mut self, node: &NodeRef) {
        match self.classify(node) {
            NodeKind::RubyContainer | NodeKind::Opaque => {}
            NodeKind::TextLeaf => self.annotate_text(node),
            NodeKind::ElementWithChildren => {
                // Replacing a text child mutates the sibling list.
                let children: Vec<NodeRef> = node.children().collect();
                for child in &children {
                    self.walk(child);
                }
            }
        }
    }

    fn classify(&self, node: &NodeRef) -> NodeKind {
        if node.parent().is_some_and(|parent| has_ruby_role(&parent)) {
            return NodeKind::RubyContainer;
        }
        match node.data() {
            NodeData::Text(_) => NodeKind::TextLeaf,
            NodeData::Element(element) => {
                let name: &str = &element.name.local;
                if name == "ruby" {
                    NodeKind::RubyContainer
                } else if self.skip_elements.iter().any(|skip| skip == name) {
                    NodeKind::Opaque
                } else {
                    NodeKind::ElementWithChildren
                }
            }
            NodeData::Document(_) | NodeData::DocumentFragment => NodeKind::ElementWithChildren,
            _ => NodeKind::Opaque,
        }
    }

    fn annotate_text(&mut self, node: &NodeRef) {
        let Some(text) = node.as_text() else {
            return;
        };
        let original = text.borrow().clone();
        self.stats.text_nodes += 1;

        match self.annotator.annotate(&original) {
            Ok(markup) if markup != original.as_str() => {
                for new_node in parse_body(&markup).children().collect::<Vec<_>>() {
                    node.insert_before(new_node);
                }
                node.detach();
                self.stats.replaced += 1;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Leaving text node {:?} untouched: {}", original, e);
                self.stats.failed += 1;
            }
        }
    }

    /// 走査の統計を返します。
    #[inline(always)]
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// 注釈器の統計を返します。
    #[inline(always)]
    pub fn annotation_stats(&self) -> AnnotationStats {
        self.annotator.stats()
    }
}

fn has_ruby_role(node: &NodeRef) -> bool {
    node.as_element()
        .is_some_and(|element| RUBY_ROLES.contains(&&*element.name.local))
}

/// HTMLを `<body>` の中身として解析し、`<body>` 要素を返します。
///
/// 先頭の空白が捨てられないよう、明示的な `<body>` の後ろに置いて解析します。
fn parse_body(html: &str) -> NodeRef {
    let document = kuchikikiki::parse_html().one(format!("<body>{html}"));
    match document.select_first("body") {
        Ok(body) => body.as_node().clone(),
        // The parser always synthesizes a body for this input.
        Err(()) => document,
    }
}
