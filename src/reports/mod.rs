use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use swarmforge::optimizer::{OptimizationResult, RunLog};

pub fn print_best_position(name: &str, position: &[f64]) {
    println!("\nPosition: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Dim").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    for (d, value) in position.iter().enumerate() {
        table.add_row(vec![
            Cell::new(d).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", value)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

/// One row every `every` iterations, plus the final one.
pub fn print_convergence_table(log: &RunLog, every: usize) {
    if log.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Iter").add_attribute(Attribute::Bold),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Avg PBest"),
        Cell::new("Diversity").fg(Color::Green),
    ]);

    let last = log.len() - 1;
    for i in (0..log.len()).filter(|&i| (i + 1) % every == 0 || i == last) {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.6e}", log.best_fitness[i])),
            Cell::new(format!("{:.6e}", log.mean_best_fitness[i])),
            Cell::new(format!("{:.4}", log.diversity[i])),
        ]);
    }

    for i in 0..4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\nConvergence:");
    println!("{}", table);
}

pub fn print_comparison_report(results: &[(String, OptimizationResult)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Run").add_attribute(Attribute::Bold),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Avg PBest"),
        Cell::new("Diversity"),
        Cell::new("Resets").fg(Color::Red),
    ]);

    for (name, result) in results {
        let log = &result.log;
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.6e}", result.best_fitness)),
            Cell::new(format!(
                "{:.6e}",
                log.mean_best_fitness.last().copied().unwrap_or(f64::NAN)
            )),
            Cell::new(format!("{:.4}", log.diversity.last().copied().unwrap_or(f64::NAN))),
            Cell::new(log.diversification_count),
        ]);
    }

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}
