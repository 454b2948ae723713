use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sku_classifier::{cli, config, dictionary, error, export, pipeline, report, selector};
use sku_classifier_common::Registry;
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SkuClassifierError};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(SkuClassifierError::BatchRejected(errors)) => {
            report::print_rejections(&errors);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(p) => Ok(Registry::from_file(p)?),
        None => Ok(Registry::builtin()),
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Classify { input, industry, category, rules, output } => {
            println!("🏷 sku-classifier - 分類\n");

            let registry = load_registry(cli.registry.as_deref())?;

            // 1. 辞書読み込み
            println!("[1/3] 辞書を読み込み中...");
            let mut cache = dictionary::RuleCache::new();
            let (rule_table, targets, label) = match rules {
                Some(rules_path) => {
                    let rule_table = cache.get_or_compile(&rules_path)?;
                    let targets = match industry.as_deref() {
                        Some(name) => registry.classifier(name)?.attributes.clone(),
                        None => rule_table.attributes().to_vec(),
                    };
                    let label = rules_path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_else(|| "regras".to_string());
                    (rule_table, targets, label)
                }
                None => {
                    let industry = selector::select_industry(&registry, industry.as_deref())?;
                    let classifier = registry.classifier(&industry.name)?;
                    let category = selector::select_category(classifier, category.as_deref())?;
                    let entry = registry.dictionary(&industry.name, &category)?;
                    let path = dictionary::dictionary_path(&config.dictionaries_dir, &entry.file)?;
                    if verbose {
                        println!("  辞書: {}", path.display());
                    }
                    (cache.get_or_compile(&path)?, classifier.attributes.clone(), category)
                }
            };
            println!(
                "✔ {}属性 / {}ルール\n",
                rule_table.attributes().len(),
                rule_table.rule_count()
            );
            report::print_rule_warnings(rule_table.warnings(), verbose);

            // 2. 分類
            println!("[2/3] 分類中...");
            let bar = progress_bar(targets.len());
            let result = pipeline::classify_file(&input, &rule_table, &targets, |_, _, attribute| {
                bar.set_message(attribute.to_string());
                bar.inc(1);
            });
            bar.finish_and_clear();
            let result = result?;
            println!("✔ {}行 / 変更 {}件\n", result.dataset.len(), result.changes.len());
            report::print_fill_stats(&result.stats);

            // 3. 保存
            println!("\n[3/3] 結果を保存中...");
            let output_dir = config.resolve_output_dir(output.as_deref(), &input);
            let written = export::excel::export_classification(
                &result,
                &label,
                &output_dir,
                &export::date_stamp(),
            )?;
            for path in &written {
                println!("✔ {}", path.display());
            }

            println!("\n✅ 分類完了");
        }

        Commands::Consolidate { files, industry, output, fragment } => {
            println!("📚 sku-classifier - 統合\n");

            let registry = load_registry(cli.registry.as_deref())?;
            let industry = selector::select_industry(&registry, industry.as_deref())?;
            let extractor = registry.extractor(&industry.name)?;
            let max_rows = if fragment { Some(config.fragment_limit(None)?) } else { None };
            let steps = if fragment { 3 } else { 2 };

            // 1. 統合
            println!("[1/{}] {}件のファイルを統合中...", steps, files.len());
            let result = pipeline::consolidate_files(&files, extractor)?;
            println!("✔ 統合完了");
            report::print_consolidation(&result, verbose);

            // 2. 保存
            println!("\n[2/{}] 結果を保存中...", steps);
            let output_dir = config.resolve_output_dir(output.as_deref(), &files[0]);
            let date = export::date_stamp();
            for path in export::excel::export_consolidation(&result, &output_dir, &date)? {
                println!("✔ {}", path.display());
            }

            // 3. 属性別分割
            if let Some(max_rows) = max_rows {
                println!("\n[3/3] 属性別に分割中...");
                let plan = sku_classifier_common::fragment(&result.master, &extractor.attributes, max_rows);
                report::print_fragment_plan(&plan);
                let written = export::excel::export_fragments(&plan.fragments, &output_dir, &date)?;
                println!("✔ {}ファイルを保存", written.len());
            }

            println!("\n✅ 統合完了");
        }

        Commands::Fragment { master, industry, output, max_rows } => {
            println!("✂ sku-classifier - 属性別分割\n");

            let registry = load_registry(cli.registry.as_deref())?;
            let extractor = match industry.as_deref() {
                Some(name) => Some(registry.extractor(name)?),
                None => None,
            };
            let max_rows = config.fragment_limit(max_rows)?;

            println!("[1/2] 分割中...");
            let plan = pipeline::fragment_file(&master, extractor, max_rows)?;
            report::print_fragment_plan(&plan);

            println!("\n[2/2] 結果を保存中...");
            let output_dir = config.resolve_output_dir(output.as_deref(), &master);
            let written =
                export::excel::export_fragments(&plan.fragments, &output_dir, &export::date_stamp())?;
            for path in &written {
                println!("✔ {}", path.display());
            }

            println!("\n✅ 分割完了");
        }

        Commands::Industries => {
            let registry = load_registry(cli.registry.as_deref())?;
            let available = selector::list_available_dictionaries(&config.dictionaries_dir);
            let exists = |file: &str| available.iter().any(|(name, _)| name == file);

            println!("業種一覧（辞書フォルダ: {}）:", config.dictionaries_dir.display());
            for industry in &registry.industries {
                println!("\n■ {}", industry.name);
                if let Some(classifier) = &industry.classifier {
                    for dict in &classifier.dictionaries {
                        let mark = if exists(&dict.file) { "✔" } else { "✗" };
                        println!("  {} {} ({})", mark, dict.category, dict.file);
                    }
                    if verbose {
                        println!("  分類属性: {}", classifier.attributes.join(", "));
                    }
                }
                if let Some(extractor) = industry.extractor.as_ref().filter(|_| verbose) {
                    println!("  統合属性: {}", extractor.attributes.join(", "));
                }
            }
        }

        Commands::Config { show, set_dictionaries_dir, set_output_dir } => {
            let mut config = config;
            let mut changed = false;

            if let Some(dir) = set_dictionaries_dir {
                config.dictionaries_dir = dir;
                changed = true;
            }
            if let Some(dir) = set_output_dir {
                config.output_dir = Some(dir);
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  辞書フォルダ: {}", config.dictionaries_dir.display());
                println!(
                    "  出力フォルダ: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "入力ファイルと同じ".to_string())
                );
                println!("  分割の最大行数: {}", config.fragment_max_rows);
            }
        }
    }

    Ok(())
}
