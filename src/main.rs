use anyhow::Context;
use clap::Parser;
use kit_report::{cli, config, export, logging, pipeline, sources};
use cli::{Cli, Commands};
use config::{Config, ConfigOverrides};
use kit_report_common::MatchSummary;
use std::path::PathBuf;

fn print_summary(summary: &MatchSummary) {
    println!("  Linhas: {}", summary.total);
    println!("  Com kit cadastrado: {}", summary.matched);
    println!("  Kit não encontrado: {}", summary.unmatched);
    println!("  Sem Tipo de Kit: {}", summary.keyless);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Report { survey, output, catalog, materials, logo_url, logo_cache, no_logo } => {
            println!("📄 kit-report - Relatório de materiais\n");

            let overrides = ConfigOverrides {
                materials_source: materials,
                logo_source: logo_url,
                logo_cache_path: logo_cache,
                no_logo,
                ..catalog.overrides()
            };
            let config = config.with_overrides(&overrides);

            // 1. SGS
            println!("[1/3] Lendo SGS...");
            let table = sources::read_first_sheet(&survey)?;
            println!("✔ {} linhas\n", table.len());

            // 2. 照合・レイアウト
            println!("[2/3] Conferindo com o cadastro e montando o relatório...");
            let report_sources = pipeline::ReportSources::from_config(&config);
            let report = pipeline::generate_report(&table, &report_sources, config.duplicate_policy)?;
            print_summary(&report.summary);
            if config.logo_source.is_some() && !report.logo_included && report.page_count > 0 {
                println!("  (logo indisponível, relatório sem logo)");
            }
            println!("✔ {} Placa(s), {} página(s)\n", report.location_count, report.page_count);

            // 3. 出力
            println!("[3/3] Gravando PDF...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = export::output_path_for(&output_dir, export::DEFAULT_REPORT_FILE_NAME);
            export::pdf::write_pdf(&report.bytes, &output_path)
                .with_context(|| format!("falha ao gravar {}", output_path.display()))?;
            println!("✔ PDF: {}", output_path.display());

            println!("\n✅ Concluído");
        }

        Commands::Check { survey, catalog } => {
            println!("🔍 kit-report - Conferência\n");

            let config = config.with_overrides(&catalog.overrides());
            let table = sources::read_first_sheet(&survey)?;
            let catalog_source = sources::WorkbookSource::new(&config.catalog_source);
            let rows = pipeline::match_only(&table, &catalog_source, config.duplicate_policy)?;

            print_summary(&MatchSummary::from_rows(&rows));

            let mut missing: Vec<&str> = Vec::new();
            for row in &rows {
                if let (Some(key), None) = (&row.kit_description_key, &row.kit_code) {
                    if !missing.contains(&key.as_str()) {
                        missing.push(key);
                    }
                }
            }
            if !missing.is_empty() {
                println!("\nKits não encontrados no cadastro:");
                for key in missing {
                    println!("  - {}", key);
                }
            }
        }

        Commands::ExportMatch { survey, output, catalog } => {
            println!("📊 kit-report - Exportar conferência\n");

            let config = config.with_overrides(&catalog.overrides());
            let table = sources::read_first_sheet(&survey)?;
            let catalog_source = sources::WorkbookSource::new(&config.catalog_source);
            let rows = pipeline::match_only(&table, &catalog_source, config.duplicate_policy)?;
            print_summary(&MatchSummary::from_rows(&rows));

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = export::output_path_for(&output_dir, export::DEFAULT_MATCH_FILE_NAME);
            println!("- Gerando Excel...");
            export::excel::generate_excel(&rows, &output_path)?;
            println!("✔ Excel: {}", output_path.display());
        }

        Commands::Config { show, set_catalog, set_materials, set_logo_url, set_logo_cache } => {
            let mut config = config;
            let changed = set_catalog.is_some()
                || set_materials.is_some()
                || set_logo_url.is_some()
                || set_logo_cache.is_some();

            if let Some(path) = set_catalog {
                config.catalog_source = path;
            }
            if let Some(path) = set_materials {
                config.materials_source = path;
            }
            if let Some(url) = set_logo_url {
                config.logo_source = Some(url);
            }
            if let Some(path) = set_logo_cache {
                config.logo_cache_path = Some(path);
            }

            if changed {
                config.save()?;
                println!("✔ Configuração salva: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("Configuração:");
                println!("  Cadastro Kits: {}", config.catalog_source.display());
                println!("  Materias Kits: {}", config.materials_source.display());
                println!("  Logo: {}", config.logo_source.as_deref().unwrap_or("(sem logo)"));
                match config.resolved_logo_cache_path() {
                    Some(path) => println!("  Cache do logo: {}", path.display()),
                    None => println!("  Cache do logo: (nenhum)"),
                }
                println!("  Descrições repetidas: {:?}", config.duplicate_policy);
            }
        }
    }

    Ok(())
}
