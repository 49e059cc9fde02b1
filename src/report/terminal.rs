use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ClassifiedPost, SentimentLabel};

const TEXT_WIDTH: usize = 80;

/// Render a colored terminal report.
pub fn render(results: &[ClassifiedPost], verbose: bool, quiet: bool) -> Result<()> {
    let total = results.len();
    let positive = count(results, SentimentLabel::Positive);
    let negative = count(results, SentimentLabel::Negative);

    if quiet {
        println!(
            "Total: {}  Positive: {}  Negative: {}",
            total,
            positive.to_string().green(),
            negative.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "tweet-sentiment".bold(),
        env!("CARGO_PKG_VERSION")
    );

    // A single post gets a one-line verdict instead of a table
    if let [only] = results {
        let (glyph, _) = label_style(only.sentiment);
        let line = format!("{} Sentiment: {}", glyph, only.sentiment);
        println!(" {}", colorize(&line, only.sentiment).bold());
        if verbose {
            println!(" Score: {:.4}", only.score);
            println!(" Text : {}", truncate(&only.post.text, TEXT_WIDTH));
        }
        println!();
        return Ok(());
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Posts analyzed : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Positive      : {:>4}", "♥".green(), positive)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Negative      : {:>4}", "✗".red(), negative)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if total > 0 {
        render_table(results, verbose);
        println!();
    }

    Ok(())
}

fn render_table(results: &[ClassifiedPost], verbose: bool) {
    let mut header = vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Author").add_attribute(Attribute::Bold),
        Cell::new("Post").add_attribute(Attribute::Bold),
        Cell::new("Sentiment").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Score").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, result) in results.iter().enumerate() {
        let (glyph, label_color) = label_style(result.sentiment);
        let author = result
            .post
            .author
            .as_deref()
            .map(|a| format!("@{}", a))
            .unwrap_or_else(|| "-".to_string());

        let mut row = vec![
            Cell::new(i + 1),
            Cell::new(author),
            Cell::new(truncate(&result.post.text, TEXT_WIDTH)),
            Cell::new(format!("{} {}", glyph, result.sentiment))
                .fg(label_color)
                .set_alignment(CellAlignment::Center),
        ];
        if verbose {
            row.push(Cell::new(format!("{:+.4}", result.score)).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }

    println!("{}", table);
}

/// Glyph and table color for a label. Display concerns stay here, not in the core.
fn label_style(label: SentimentLabel) -> (&'static str, Color) {
    match label {
        SentimentLabel::Positive => ("♥", Color::Green),
        SentimentLabel::Negative => ("✗", Color::Red),
    }
}

fn colorize(s: &str, label: SentimentLabel) -> ColoredString {
    match label {
        SentimentLabel::Positive => s.green(),
        SentimentLabel::Negative => s.red(),
    }
}

fn count(results: &[ClassifiedPost], label: SentimentLabel) -> usize {
    results.iter().filter(|r| r.sentiment == label).count()
}

/// Shorten `text` to at most `max` characters, on one line.
fn truncate(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
