use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use hdu_remote_judge::{logging, Config, ResultView, SubmissionForm, SubmissionTracker};

const USAGE: &str = "用法: hdu-remote-judge [--json] <题目ID> <语言> <源代码文件>\n\
                     环境变量: HDU_PHPSESSID, HDU_USERNAME (可选 JUDGE_CONFIG 指向 TOML 配置)";

struct Args {
    json: bool,
    problem_id: String,
    language: String,
    source_path: String,
}

fn parse_args() -> Result<Args> {
    let mut json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            positional.push(arg);
        }
    }

    match <[String; 3]>::try_from(positional) {
        Ok([problem_id, language, source_path]) => Ok(Args {
            json,
            problem_id,
            language,
            source_path,
        }),
        Err(_) => bail!("{}", USAGE),
    }
}

fn load_config() -> Result<Config> {
    match std::env::var("JUDGE_CONFIG") {
        Ok(path) => Config::from_toml_file(&path).with_context(|| format!("无法加载配置文件: {}", path)),
        Err(_) => Config::from_env().context("环境变量中的配置无效"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = load_config()?;

    // 初始化日志
    logging::init_with_verbose(config.verbose_logging);

    let args = parse_args()?;
    let source = tokio::fs::read_to_string(&args.source_path)
        .await
        .with_context(|| format!("无法读取源代码文件: {}", args.source_path))?;

    let form = SubmissionForm {
        phpsessid: std::env::var("HDU_PHPSESSID").context("缺少环境变量 HDU_PHPSESSID")?,
        username: std::env::var("HDU_USERNAME").context("缺少环境变量 HDU_USERNAME")?,
        problem_id: args.problem_id,
        language: Some(args.language),
        source,
    };
    let request = form.into_request()?;

    let tracker = SubmissionTracker::new(config);
    let result = tracker.track(&request).await;

    let view = ResultView::from(&result);
    if args.json {
        println!("{}", view.to_json()?);
    } else {
        print!("{}", view.render_text());
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
