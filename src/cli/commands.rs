use crate::config::AppConfig;
use crate::error::DocSearchResult;
use crate::frame::ResultTable;
use crate::search::{DocumentSearch, SearchField, SearchOutcome};
use crate::session::Session;
use crate::translate::{GoogleTranslator, TranslationPipeline, TranslationReport, Translator};
use crate::upload::UploadedFile;
use crate::warning::Warning;
use colored::Colorize;
use std::path::PathBuf;

/// Widest a cell is printed before it is cut with an ellipsis
const MAX_CELL_WIDTH: usize = 40;

/// Execute the translate command
pub fn translate(
    files: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    query: Option<String>,
    config: &AppConfig,
    verbose: bool,
) -> DocSearchResult<()> {
    let translator = GoogleTranslator::new(&config.translation)?;
    translate_with(&translator, files, output_dir, query, config, verbose)
}

/// Translate with an explicit translation service
pub fn translate_with(
    translator: &dyn Translator,
    files: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    query: Option<String>,
    config: &AppConfig,
    verbose: bool,
) -> DocSearchResult<()> {
    let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());

    println!("{}", "🔤 STR Document Search - Translate Marathi Excel Files".bold().green());
    println!("   Files:  {}", files.len());
    println!("   Output: {}\n", output_dir.display());

    let uploads: Vec<UploadedFile> = files.iter().map(UploadedFile::from_path).collect();

    if verbose {
        println!(
            "{}",
            format!(
                "🌐 Translating {} → {} (up to {} attempts per cell)...",
                config.translation.source_lang,
                config.translation.target_lang,
                config.translation.max_attempts
            )
            .cyan()
        );
    }

    let pipeline = TranslationPipeline::new(translator, &config.translation, &output_dir);
    let run = pipeline.run(&uploads);

    let mut session = Session::new();
    let report = session.replace_translations(run);
    print_translation_report(&report, verbose);

    if let Some(query) = query {
        println!();
        let outcome = session.search_property_description(&query);
        print_outcome(&outcome);
    }

    Ok(())
}

/// Execute the search command
pub fn search(files: Vec<PathBuf>, column: SearchField, value: String) -> DocSearchResult<()> {
    println!("{}", "🔎 STR Document Search - Search Document Details".bold().green());
    println!("   Files:  {}", files.len());
    println!("   Column: {}\n", column.label().bright_blue());

    let uploads: Vec<UploadedFile> = files.iter().map(UploadedFile::from_path).collect();
    let outcome = DocumentSearch::new(column, value).run(&uploads);
    print_outcome(&outcome);

    Ok(())
}

/// Execute the fields command
pub fn fields() -> DocSearchResult<()> {
    println!("{}", "Searchable columns:".bold());
    for field in SearchField::ALL {
        let marker = if field == SearchField::default() {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("   {}{}", field.label().bright_blue(), marker);
    }
    Ok(())
}

fn print_translation_report(report: &TranslationReport, verbose: bool) {
    print_warnings(&report.warnings);

    for file in &report.files {
        println!(
            "{}",
            format!("✅ File {} has been translated.", file.original_name).green()
        );
        if verbose {
            println!(
                "   {} rows, {} cells translated, {} kept original",
                file.rows, file.cells_translated, file.cells_fallback
            );
        }
        if let Some(path) = &file.export_path {
            println!("   📥 Download Translated: {}", path.display());
        }
    }

    if report.files.is_empty() {
        println!("{}", "No files were translated.".yellow());
    }
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        println!("{}", format!("⚠️  {}", warning).yellow());
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    print_warnings(&outcome.warnings);

    if outcome.has_results() {
        println!("{}", outcome.summary().bold());
        println!("{}", render_table(&outcome.table));
        println!("   {} rows", outcome.table.len());
    } else {
        println!("{}", outcome.summary().cyan());
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() > MAX_CELL_WIDTH {
        let cut: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        value.to_string()
    }
}

/// Render a result table as aligned plain text, index column first
pub fn render_table(table: &ResultTable) -> String {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(table.columns.iter().map(|c| truncate(c)))
        .collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.index.to_string())
                .chain(
                    row.cells
                        .iter()
                        .map(|c| c.as_deref().map(truncate).unwrap_or_default()),
                )
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line(header.as_slice()));
    for row in &rows {
        lines.push(format_line(row.as_slice()));
    }
    lines.join("\n")
}
