//! A terminal preview of a stored year: months, painted runs and their labels.
//!
//! Usage: `preview <vault-root> [year]`

use std::path::Path;
use std::sync::Arc;

use chrono::Datelike;

use wall_planner::grid::{GRID_COLS, GRID_ROWS, MONTH_NAMES};
use wall_planner::save_queue::SaveQueue;
use wall_planner::session::Session;
use wall_planner::store::YearStore;
use wall_planner::vault::FsVault;

const PLANNER_FOLDER: &str = ".year-planner";

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let root = match args.next() {
        Some(root) => root,
        None => {
            eprintln!("Usage: preview <vault-root> [year]");
            std::process::exit(2);
        }
    };
    let year = args.next()
        .and_then(|y| y.parse().ok())
        .unwrap_or_else(wall_planner::grid::current_year);

    let vault = Arc::new(FsVault::new(root));
    let store = YearStore::new(vault, Path::new(PLANNER_FOLDER));
    let queue = SaveQueue::spawn(store.clone());
    let session = Session::open(store, queue, year).await;

    println!("==== {} ====", session.year());
    for (index, name) in MONTH_NAMES.iter().enumerate() {
        let month = index as u32 + 1;
        println!("\n{} {}", name, session.year());

        let matrix = session.month_matrix(month);
        if matrix.len() < GRID_ROWS * GRID_COLS {
            continue;
        }
        for row in 0..GRID_ROWS {
            let pills = session.pills_for(month, row);

            let mut line = String::new();
            for col in 0..GRID_COLS {
                let cell = &matrix[row * GRID_COLS + col];
                let covered = pills.iter().any(|p| p.covers(col));
                if !cell.in_month {
                    line.push_str("  . ");
                } else if covered {
                    line.push_str(&format!("[{:>2}]", cell.date.day()));
                } else {
                    line.push_str(&format!(" {:>2} ", cell.date.day()));
                }
            }
            for pill in pills {
                line.push_str(&format!("  <{} days, {}{}>",
                    pill.len(),
                    pill.color(),
                    if pill.label().is_empty() { String::new() } else { format!(", {:?}", pill.label()) },
                ));
            }
            println!("{}", line);
        }
    }
}
