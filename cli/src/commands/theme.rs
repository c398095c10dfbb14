use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use carematch_theme::contrast::ContrastResult;
use carematch_theme::{PreviewState, StyleTokens, ThemeEngine, ThemeQuery, Variant};
use color_eyre::eyre::{eyre, Result};

use crate::cli::ThemeCommands;
use crate::clipboard::SystemClipboard;
use crate::commands::open_engine;
use crate::config::AppConfig;

pub fn run(command: Option<ThemeCommands>, config: &AppConfig) -> Result<()> {
    let mut engine = open_engine(config);

    let cmd = command.unwrap_or(ThemeCommands::List {
        category: None,
        variant: None,
        builtin: false,
        imported: false,
    });

    match cmd {
        ThemeCommands::List {
            category,
            variant,
            builtin,
            imported,
        } => {
            let variant = variant
                .map(|v| v.parse::<Variant>().map_err(|e| eyre!(e)))
                .transpose()?;
            let query = ThemeQuery {
                category,
                variant,
                builtin_only: builtin,
                imported_only: imported,
            };
            list(&engine, &query);
        }
        ThemeCommands::Show { id, css } => {
            let palette = engine
                .palette_for(&id)
                .ok_or_else(|| eyre!("Theme '{}' not found", id))?;
            if css {
                let tokens = StyleTokens::new(&palette, engine.preference());
                print!("{}", tokens.to_css(":root"));
            } else {
                println!("{:<18} {:<9} LCH", "Role", "Hex");
                println!("{}", "-".repeat(50));
                for (role, color) in palette.iter() {
                    println!(
                        "{:<18} {:<9} {:>5.1} {:>5.1} {:>5.1}",
                        role.as_str(),
                        color.to_hex(),
                        color.l,
                        color.c,
                        color.h
                    );
                }
            }
        }
        ThemeCommands::Report { id, json } => {
            let report = engine
                .accessibility_report(&id)
                .ok_or_else(|| eyre!("Theme '{}' not found", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Contrast ratio: {:.2}", report.contrast_ratio);
                println!("Grade:          {}", report.grade);
                println!("Harmony:        {}", report.harmony);
                println!("Temperature:    {}", report.temperature);
                println!("Saturation:     {}", report.saturation_level);
            }
        }
        ThemeCommands::Check { id, verbose } => {
            let ids: Vec<String> = match id {
                Some(id) => vec![id],
                None => engine.list_themes().iter().map(|t| t.id().to_string()).collect(),
            };

            let mut results = Vec::new();
            for id in &ids {
                let audit = engine
                    .contrast_audit(id)
                    .ok_or_else(|| eyre!("Theme '{}' not found", id))?;
                results.extend(audit);
            }
            print_results(&results, verbose);

            if results.iter().any(|r| !r.pass) {
                std::process::exit(1);
            }
        }
        ThemeCommands::Export { id, copy, output } => {
            if copy {
                let mut clipboard = SystemClipboard::new();
                let export = engine
                    .export_to_clipboard(&id, &mut clipboard)
                    .ok_or_else(|| eyre!("Theme '{}' not found", id))?;
                write_export(&export.text, output.as_deref())?;
                match export.copied {
                    Ok(()) => eprintln!("Copied '{}' to the clipboard.", id),
                    Err(e) => eprintln!("Could not copy to the clipboard: {}", e),
                }
            } else {
                let text = engine
                    .export_theme(&id)
                    .ok_or_else(|| eyre!("Theme '{}' not found", id))?;
                write_export(&text, output.as_deref())?;
            }
        }
        ThemeCommands::Import { file } => {
            let content = if file.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&file)?
            };

            match engine.import_theme(&content) {
                Ok(id) => {
                    engine.flush();
                    println!("Imported theme '{}'.", id);
                    println!("Select it with: carematch theme use {}", id);
                }
                Err(e) => {
                    eprintln!("Import rejected:");
                    for error in e.validation_errors() {
                        eprintln!("  - {}: {}", error.field(), error);
                    }
                    std::process::exit(1);
                }
            }
        }
        ThemeCommands::Use { id } => {
            if !engine.set_theme(&id) {
                return Err(eyre!("Theme '{}' not found", id));
            }
            engine.flush();
            if let Some(theme) = engine.theme(&id) {
                println!("Active theme: {}", theme.label());
            }
        }
        ThemeCommands::Preview {
            id,
            duration,
            no_wait,
        } => preview(&mut engine, &id, duration, no_wait)?,
        ThemeCommands::Current => {
            let id = engine.effective_theme_id();
            match engine.theme(&id) {
                Some(theme) => println!("/* {}: {} */", id, theme.label()),
                None => println!("/* {} */", id),
            }
            print!("{}", engine.tokens().to_css(":root"));
        }
    }

    Ok(())
}

fn list(engine: &ThemeEngine, query: &ThemeQuery) {
    let themes = engine.query_themes(query);
    if themes.is_empty() {
        println!("No themes found.");
        if query.category.is_some() {
            println!("Categories: {}", engine.registry().categories().join(", "));
        }
        return;
    }

    let active = &engine.preference().active_theme_id;
    println!(
        "  {:<22} {:<22} {:<7} {:<14} {:>4}  Type",
        "ID", "Name", "Variant", "Category", "Pop"
    );
    println!("{}", "-".repeat(84));
    for theme in themes {
        let marker = if theme.id() == active { "*" } else { " " };
        let popularity = theme
            .popularity()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let theme_type = if theme.is_builtin() { "builtin" } else { "imported" };
        println!(
            "{} {:<22} {:<22} {:<7} {:<14} {:>4}  {}",
            marker,
            theme.id(),
            theme.name(),
            theme.variant().as_str(),
            theme.category(),
            popularity,
            theme_type
        );
    }
}

fn write_export(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn preview(
    engine: &mut ThemeEngine,
    id: &str,
    duration: Option<Duration>,
    no_wait: bool,
) -> Result<()> {
    if !engine.preview_theme(id, duration) {
        return Err(eyre!("Theme '{}' not found", id));
    }

    println!("/* previewing {} */", id);
    print!("{}", engine.tokens().to_css(":root"));
    if no_wait {
        return Ok(());
    }

    let mut stderr = std::io::stderr();
    loop {
        match engine.preview_state() {
            PreviewState::Previewing { remaining, .. } => {
                let shown = Duration::from_secs(remaining.as_secs());
                write!(
                    stderr,
                    "\rReverting in {:<12}",
                    humantime::format_duration(shown).to_string()
                )?;
                stderr.flush()?;
                std::thread::sleep(remaining.min(Duration::from_millis(250)));
            }
            PreviewState::Idle => break,
        }
    }
    writeln!(stderr)?;

    println!("/* reverted to {} */", engine.effective_theme_id());
    Ok(())
}

fn print_results(results: &[ContrastResult], verbose: bool) {
    let failures = results.iter().filter(|r| !r.pass).count();

    let mut current_theme = "";
    for result in results {
        if !verbose && result.pass {
            continue;
        }
        if result.theme_id != current_theme {
            current_theme = &result.theme_id;
            println!();
            println!("{} ({})", result.theme_name, result.variant);
        }
        let status = if result.pass { "ok  " } else { "FAIL" };
        println!(
            "  {} {:<34} {} on {}  {:>5.2}:1  {}",
            status, result.pair, result.fg_hex, result.bg_hex, result.ratio, result.grade
        );
    }

    println!();
    if failures == 0 {
        println!("All {} contrast checks passed.", results.len());
    } else {
        println!(
            "{} of {} contrast checks below WCAG AA (4.5:1).",
            failures,
            results.len()
        );
    }
}
