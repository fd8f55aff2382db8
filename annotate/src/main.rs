//! HTMLファイルに振り仮名を付けるユーティリティ
//!
//! このバイナリは、入力HTMLファイルを読み込み、テキストを形態素解析して
//! 漢字にルビを付け、結果を出力ファイルに書き出します。
//! 出力ファイルを省略した場合は、入力パスに `.processed.html` を付けたパスに書き出します。

use std::fs;
use std::path::{Path, PathBuf};

use furiganate::errors::Result;
use furiganate::{Annotator, DocumentWalker, FeatureLayout, Segmenter, VibratoSegmenter};

use clap::Parser;

/// 出力パスを省略したときに入力パスに付ける接尾辞
const OUTPUT_SUFFIX: &str = ".processed.html";

const USAGE: &str = "Usage: annotate --sysdic <SYSDIC> <INPUT_HTML_FILE> [OUTPUT_HTML_FILE]";

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "annotate", about = "Adds furigana to Japanese HTML")]
struct Args {
    /// Input HTML file.
    input: Option<PathBuf>,

    /// Output HTML file. Defaults to the input path with `.processed.html` appended.
    output: Option<PathBuf>,

    /// System dictionary (in zstd, or an uncompressed rkyv dictionary).
    #[clap(short = 'i', long)]
    sysdic: Option<PathBuf>,

    /// Index of the reading in the comma-separated feature string.
    #[clap(short = 'r', long, default_value = "7")]
    reading_field: usize,

    /// Feature value meaning that the reading is unknown.
    #[clap(long, default_value = "*")]
    unknown_reading: String,

    /// Additional elements whose text is left untouched. Can be repeated.
    #[clap(long = "skip")]
    skip: Vec<String>,
}

/// 出力パスの既定値を返します。
fn default_output(input: &Path) -> PathBuf {
    let mut output = input.as_os_str().to_owned();
    output.push(OUTPUT_SUFFIX);
    PathBuf::from(output)
}

/// 入力ファイルを処理し、書き出した出力パスを返します。
///
/// # 引数
///
/// * `input` - 入力HTMLファイル
/// * `output` - 出力HTMLファイル。`None` の場合は [`default_output`]
/// * `segmenter` - 形態素解析器
/// * `skip` - 追加で走査しない要素名
fn run<S>(input: &Path, output: Option<&Path>, segmenter: S, skip: &[String]) -> Result<PathBuf>
where
    S: Segmenter,
{
    let html = fs::read_to_string(input)?;

    let mut walker = DocumentWalker::new(Annotator::new(segmenter));
    for name in skip {
        walker = walker.skip_element(name);
    }
    let processed = walker.process(&html)?;

    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    fs::write(&output, processed)?;

    log::info!("{:?}", walker.stats());
    log::info!("{:?}", walker.annotation_stats());
    Ok(output)
}

/// メイン関数
///
/// 引数が不足している場合は使い方を表示して終了します。
/// 処理中のエラーはメッセージを表示し、正常終了します。
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let (Some(input), Some(sysdic)) = (args.input.as_deref(), args.sysdic.as_deref()) else {
        println!("{USAGE}");
        return;
    };

    let layout = FeatureLayout::new(args.reading_field, args.unknown_reading.as_str());
    let result = VibratoSegmenter::open(sysdic)
        .map(|segmenter| segmenter.layout(layout))
        .and_then(|segmenter| run(input, args.output.as_deref(), segmenter, &args.skip));

    match result {
        Ok(output) => println!("Processed HTML saved to {}", output.display()),
        Err(e) => println!("Error: {e}"),
    }
}
