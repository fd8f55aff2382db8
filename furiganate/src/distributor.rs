//! 形態素の読みを漢字の連続区間に配分するモジュール
//!
//! 形態素解析器は形態素全体の読みしか返さないため、表層形のどの漢字の上に
//! 読みのどの部分を置くかをここで決めます。次の方式を順に試し、
//! 最初に構造的に適用できたものを使います。
//!
//! 1. [`Strategy::ExactLength`]: 表層形と読みの長さが等しく、漢字以外の文字が
//!    同じ位置の読みと一致する場合、各区間は同じ位置の読みを受け取ります。
//! 2. [`Strategy::WholeReading`]: 漢字の区間が1つだけで仮名を含まない場合、
//!    その区間が読み全体を受け取ります。
//! 3. [`Strategy::KanaAnchor`]: 表層形の仮名（送り仮名など）を読みの中から探し、
//!    それを境界として各区間の読みを決めます。
//! 4. [`Strategy::Proportional`]: 読みの長さを漢字の数で均等に割り、余りは先頭の
//!    漢字から1文字ずつ配ります。結果は近似です。
//!
//! いずれの方式でも同じ入力には同じ結果を返します。

use std::ops::Range;

use crate::character::{is_kana, kanji_runs};
use crate::errors::Result;
use crate::fragment::Fragment;
use crate::reading::kana_eq;

/// 形態素解析器が「読み不明」を表すのに使う値
pub const UNKNOWN_READING: &str = "*";

/// 読みの配分方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// 漢字を含まないため注釈なし
    Passthrough,
    /// 読みがないため注釈なし
    Unread,
    /// 長さの一致による配分
    ExactLength,
    /// 単一区間への読み全体の割り当て
    WholeReading,
    /// 仮名を手がかりにした配分
    KanaAnchor,
    /// 比例配分
    Proportional,
}

/// 各区間に割り当てた読みの範囲（読みの文字インデックス）
struct Assignment {
    slices: Vec<Range<usize>>,
    strategy: Strategy,
    approximate: bool,
}

/// 表層形と読みから注釈付き断片を作成します。
///
/// `reading` は平仮名に正規化済みであることを想定しています。
/// 表層形に漢字がない場合、または読みが `None`・空・[`UNKNOWN_READING`] の場合は
/// 表層形をそのまま返します。
///
/// # 引数
///
/// * `surface` - 形態素の表層形
/// * `reading` - 形態素全体の読み
///
/// # 戻り値
///
/// 漢字の連続区間ごとにルビを付けた断片
///
/// # エラー
///
/// 組み立てた断片が表層形を再構成できない場合、
/// [`FuriganaError::StructuralMismatch`](crate::errors::FuriganaError::StructuralMismatch)
/// が返されます。
///
/// # 例
///
/// ```
/// use furiganate::distributor::{distribute, Strategy};
///
/// let fragment = distribute("男の子", Some("おとこのこ"))?;
/// assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
/// assert_eq!(
///     fragment.to_markup(),
///     "<ruby><rb>男</rb><rt>おとこ</rt></ruby>の<ruby><rb>子</rb><rt>こ</rt></ruby>",
/// );
/// # Ok::<(), furiganate::errors::FuriganaError>(())
/// ```
pub fn distribute(surface: &str, reading: Option<&str>) -> Result<Fragment> {
    let chars: Vec<char> = surface.chars().collect();
    let runs = kanji_runs(&chars);
    if runs.is_empty() {
        return Ok(Fragment::passthrough(surface, Strategy::Passthrough));
    }
    let reading: Vec<char> = match reading {
        Some(reading) if !reading.is_empty() && reading != UNKNOWN_READING => {
            reading.chars().collect()
        }
        _ => return Ok(Fragment::passthrough(surface, Strategy::Unread)),
    };

    let assignment = assign(&chars, &reading, &runs);
    if assignment.approximate {
        log::debug!(
            "approximate reading split for {:?} ({:?}) with {:?}",
            surface,
            reading.iter().collect::<String>(),
            assignment.strategy,
        );
    }

    let fragment = compose(&chars, &reading, &runs, &assignment);
    fragment.verify(surface)?;
    Ok(fragment)
}

fn assign(chars: &[char], reading: &[char], runs: &[Range<usize>]) -> Assignment {
    let mut assignment = if let Some(slices) = exact_length(chars, reading, runs) {
        Assignment {
            slices,
            strategy: Strategy::ExactLength,
            approximate: false,
        }
    } else if !chars.iter().copied().any(is_kana) {
        if runs.len() == 1 {
            Assignment {
                slices: vec![0..reading.len()],
                strategy: Strategy::WholeReading,
                approximate: false,
            }
        } else {
            Assignment {
                slices: proportional(reading.len(), runs),
                strategy: Strategy::Proportional,
                approximate: true,
            }
        }
    } else {
        kana_anchor(chars, reading, runs)
    };
    // An empty reading above a kanji run is never exact.
    assignment.approximate |= assignment.slices.iter().any(|slice| slice.is_empty());
    assignment
}

/// 長さが一致し、漢字以外の文字がすべて同じ位置の読みと一致する場合に、
/// 区間と同じ位置の読みを割り当てます。
fn exact_length(
    chars: &[char],
    reading: &[char],
    runs: &[Range<usize>],
) -> Option<Vec<Range<usize>>> {
    if chars.len() != reading.len() {
        return None;
    }
    let mut pos = 0;
    for run in runs {
        if !aligned(&chars[pos..run.start], &reading[pos..run.start]) {
            return None;
        }
        pos = run.end;
    }
    if !aligned(&chars[pos..], &reading[pos..]) {
        return None;
    }
    Some(runs.to_vec())
}

fn aligned(surface: &[char], reading: &[char]) -> bool {
    surface.iter().zip(reading).all(|(&s, &r)| kana_eq(s, r))
}

/// 表層形の仮名を読みの中の同期点として使い、区間ごとの読みを決めます。
///
/// 区間の直後（次の区間の手前まで）にある最初の仮名を、読みのカーソルの
/// 1文字先から探します。見つかればその手前までが区間の読みです。
/// 後ろに仮名がない最後の区間は、残りの読みをすべて受け取ります。
/// それ以外の場合は残りの読みを比例配分し、近似として扱います。
fn kana_anchor(chars: &[char], reading: &[char], runs: &[Range<usize>]) -> Assignment {
    let mut slices = Vec::with_capacity(runs.len());
    let mut approximate = false;
    let mut cursor = 0;
    let mut pos = 0;
    let mut remaining_kanji: usize = runs.iter().map(|run| run.len()).sum();

    for (i, run) in runs.iter().enumerate() {
        cursor = synchronize(&chars[pos..run.start], reading, cursor);

        let gap_end = runs.get(i + 1).map_or(chars.len(), |next| next.start);
        let anchor = chars[run.end..gap_end].iter().copied().find(|&c| is_kana(c));
        let end = match anchor {
            Some(kana) => find_kana(reading, cursor + 1, kana),
            None if i + 1 == runs.len() => Some(reading.len()),
            None => None,
        };
        let end = match end {
            Some(end) => end,
            None => {
                approximate = true;
                cursor + share(reading.len() - cursor, remaining_kanji, 0, run.len())
            }
        };

        slices.push(cursor..end);
        cursor = end;
        pos = run.end;
        remaining_kanji -= run.len();
    }

    Assignment {
        slices,
        strategy: Strategy::KanaAnchor,
        approximate,
    }
}

/// 仮名が読みのカーソル位置と一致するたびにカーソルを進めます。
///
/// 一致しない場合、カーソルはそのままです。
fn synchronize(chars: &[char], reading: &[char], mut cursor: usize) -> usize {
    for &c in chars {
        if is_kana(c) && reading.get(cursor).is_some_and(|&r| kana_eq(c, r)) {
            cursor += 1;
        }
    }
    cursor
}

fn find_kana(reading: &[char], from: usize, kana: char) -> Option<usize> {
    reading
        .get(from..)?
        .iter()
        .position(|&r| kana_eq(r, kana))
        .map(|offset| from + offset)
}

/// 読みの長さを漢字の数で均等に割り、余りを先頭の漢字から配ります。
fn proportional(len: usize, runs: &[Range<usize>]) -> Vec<Range<usize>> {
    let total: usize = runs.iter().map(|run| run.len()).sum();
    let mut seen = 0;
    let mut start = 0;
    runs.iter()
        .map(|run| {
            let width = share(len, total, seen, run.len());
            seen += run.len();
            let slice = start..start + width;
            start += width;
            slice
        })
        .collect()
}

/// `len` 文字を `total` 個の漢字に配るとき、`seen` 番目から続く `n` 個の漢字が
/// 受け取る文字数を返します。
///
/// 各漢字は `len / total` 文字を受け取り、先頭から `len % total` 個の漢字は
/// さらに1文字を受け取ります。
#[inline(always)]
fn share(len: usize, total: usize, seen: usize, n: usize) -> usize {
    let quota = len / total;
    let extra = len % total;
    n * quota + extra.min(seen + n) - extra.min(seen)
}

fn compose(
    chars: &[char],
    reading: &[char],
    runs: &[Range<usize>],
    assignment: &Assignment,
) -> Fragment {
    let mut fragment = Fragment::new(assignment.strategy, assignment.approximate);
    let mut pos = 0;
    for (run, slice) in runs.iter().zip(&assignment.slices) {
        for &c in &chars[pos..run.start] {
            fragment.push_plain(c);
        }
        let base = chars[run.clone()].iter().collect();
        let ruby = reading.get(slice.clone()).unwrap_or(&[]).iter().collect();
        fragment.push_ruby(base, ruby);
        pos = run.end;
    }
    for &c in &chars[pos..] {
        fragment.push_plain(c);
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fragment::Segment;

    fn ruby(base: &str, reading: &str) -> Segment {
        Segment::Ruby {
            base: base.to_string(),
            reading: reading.to_string(),
        }
    }

    fn plain(text: &str) -> Segment {
        Segment::Plain(text.to_string())
    }

    /// 表層形から漢字以外の文字を除いた位置で読みを比べるための文字列
    fn reading_without_literals(surface: &str, reading: &str) -> String {
        let mut rest: Vec<char> = reading.chars().collect();
        for c in surface.chars().filter(|&c| is_kana(c)) {
            if let Some(i) = rest.iter().position(|&r| kana_eq(r, c)) {
                rest.remove(i);
            }
        }
        rest.into_iter().collect()
    }

    #[test]
    fn test_exact_length() {
        let fragment = distribute("食べる", Some("たべる")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::ExactLength);
        assert!(!fragment.is_approximate());
        assert_eq!(fragment.segments(), &[ruby("食", "た"), plain("べる")]);
    }

    #[test]
    fn test_exact_length_multiple_runs() {
        let fragment = distribute("聞き取り", Some("ききとり")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::ExactLength);
        assert_eq!(
            fragment.segments(),
            &[ruby("聞", "き"), plain("き"), ruby("取", "と"), plain("り")]
        );
    }

    #[test]
    fn test_exact_length_katakana_surface() {
        let fragment = distribute("ケーキ屋", Some("けーきや")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::ExactLength);
        assert_eq!(fragment.segments(), &[plain("ケーキ"), ruby("屋", "や")]);
    }

    #[test]
    fn test_kana_anchor() {
        let fragment = distribute("男の子", Some("おとこのこ")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert!(!fragment.is_approximate());
        assert_eq!(
            fragment.segments(),
            &[ruby("男", "おとこ"), plain("の"), ruby("子", "こ")]
        );
    }

    #[test]
    fn test_kana_anchor_okurigana() {
        let fragment = distribute("承る", Some("うけたまわる")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert_eq!(fragment.segments(), &[ruby("承", "うけたまわ"), plain("る")]);

        let fragment = distribute("食べ物", Some("たべもの")).unwrap();
        assert_eq!(
            fragment.segments(),
            &[ruby("食", "た"), plain("べ"), ruby("物", "もの")]
        );

        let fragment = distribute("お茶", Some("おちゃ")).unwrap();
        assert!(!fragment.is_approximate());
        assert_eq!(fragment.segments(), &[plain("お"), ruby("茶", "ちゃ")]);
    }

    #[test]
    fn test_kana_anchor_skips_reading_start() {
        // The first き of the reading belongs to 聞.
        let fragment = distribute("聞きました", Some("ききました")).unwrap();
        assert_eq!(fragment.segments()[0], ruby("聞", "き"));

        let fragment = distribute("聞き役", Some("ききやく")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert_eq!(
            fragment.segments(),
            &[ruby("聞", "き"), plain("き"), ruby("役", "やく")]
        );
    }

    #[test]
    fn test_kana_anchor_missing_anchor_is_approximate() {
        let fragment = distribute("見る", Some("みた")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert!(fragment.is_approximate());
        assert_eq!(fragment.segments(), &[ruby("見", "みた"), plain("る")]);
    }

    #[test]
    fn test_kana_anchor_missing_anchor_before_later_run() {
        // No kana between 一 and 二: 一 takes its share of the whole reading.
        let fragment = distribute("一A二を", Some("いちにを")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert!(fragment.is_approximate());
        assert_eq!(
            fragment.segments(),
            &[ruby("一", "いち"), plain("A"), ruby("二", "に"), plain("を")]
        );
    }

    #[test]
    fn test_kana_anchor_missing_anchor_shares_over_remaining_kanji() {
        // 7 over 3 kanji gives 山 the remainder; 4 over the last 2 gives 川 two.
        let fragment = distribute("山A川B海を", Some("やまかわうみを")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::KanaAnchor);
        assert!(fragment.is_approximate());
        assert_eq!(
            fragment.segments(),
            &[
                ruby("山", "やまか"),
                plain("A"),
                ruby("川", "わう"),
                plain("B"),
                ruby("海", "み"),
                plain("を"),
            ]
        );
    }

    #[test]
    fn test_whole_reading() {
        let fragment = distribute("東京", Some("とうきょう")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::WholeReading);
        assert!(!fragment.is_approximate());
        assert_eq!(fragment.segments(), &[ruby("東京", "とうきょう")]);
    }

    #[test]
    fn test_proportional() {
        let fragment = distribute("一1二", Some("いちに")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::Proportional);
        assert!(fragment.is_approximate());
        assert_eq!(
            fragment.segments(),
            &[ruby("一", "いち"), plain("1"), ruby("二", "に")]
        );
    }

    #[test]
    fn test_proportional_remainder_goes_to_earliest() {
        let fragment = distribute("春A夏B秋", Some("あいうえお")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::Proportional);
        assert_eq!(fragment.readings(), "あいうえお");
        assert_eq!(
            fragment.segments(),
            &[
                ruby("春", "あい"),
                plain("A"),
                ruby("夏", "うえ"),
                plain("B"),
                ruby("秋", "お"),
            ]
        );
    }

    #[test]
    fn test_proportional_short_reading() {
        let fragment = distribute("山A川B海", Some("や")).unwrap();
        assert!(fragment.is_approximate());
        assert_eq!(fragment.readings(), "や");
        assert_eq!(fragment.segments()[0], ruby("山", "や"));
        assert_eq!(fragment.segments()[2], ruby("川", ""));
    }

    #[test]
    fn test_share() {
        assert_eq!(share(5, 3, 0, 1), 2);
        assert_eq!(share(5, 3, 1, 1), 2);
        assert_eq!(share(5, 3, 2, 1), 1);
        assert_eq!(share(5, 3, 0, 3), 5);
        assert_eq!(share(7, 3, 0, 2), 5);
        assert_eq!(share(7, 3, 2, 1), 2);
    }

    #[test]
    fn test_passthrough() {
        let fragment = distribute("です", Some("です")).unwrap();
        assert_eq!(fragment.strategy(), Strategy::Passthrough);
        assert_eq!(fragment.to_markup(), "です");

        let fragment = distribute("ABC", None).unwrap();
        assert_eq!(fragment.to_markup(), "ABC");
    }

    #[test]
    fn test_unread() {
        for reading in [None, Some("*"), Some("")] {
            let fragment = distribute("漢字", reading).unwrap();
            assert_eq!(fragment.strategy(), Strategy::Unread);
            assert!(!fragment.has_ruby());
            assert_eq!(fragment.to_markup(), "漢字");
        }
    }

    #[test]
    fn test_reconstruction() {
        let cases = [
            ("食べる", "たべる"),
            ("男の子", "おとこのこ"),
            ("東京", "とうきょう"),
            ("一1二", "いちに"),
            ("見る", "みた"),
            ("取り扱い", "とりあつかい"),
            ("大人しい", "おとなしい"),
            ("東京都。", "とうきょうと"),
            ("日本語", "に"),
            ("々人", "ひと"),
            ("書き", "x"),
        ];
        for (surface, reading) in cases {
            let fragment = distribute(surface, Some(reading)).unwrap();
            assert_eq!(fragment.base_text(), surface, "{surface}");
        }
    }

    #[test]
    fn test_reading_conservation_on_exact_paths() {
        let cases = [
            ("食べる", "たべる"),
            ("男の子", "おとこのこ"),
            ("取り扱い", "とりあつかい"),
            ("大人しい", "おとなしい"),
            ("聞き役", "ききやく"),
        ];
        for (surface, reading) in cases {
            let fragment = distribute(surface, Some(reading)).unwrap();
            assert!(!fragment.is_approximate(), "{surface}");
            assert_eq!(
                fragment.readings(),
                reading_without_literals(surface, reading),
                "{surface}"
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let a = distribute("春A夏B秋", Some("あいうえおか")).unwrap();
        let b = distribute("春A夏B秋", Some("あいうえおか")).unwrap();
        assert_eq!(a, b);
    }
}
