// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help() {
    println!(
        "minutes2md v{} - Convert Word meeting minutes (.docx) to Markdown",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    minutes2md <input.docx> <output.md>");
    println!("    minutes2md --help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose         Show debug output for every table and paragraph.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    minutes2md minutes/meeting-2026-02-05.docx minutes/meeting-2026-02-05.md");
    println!("    minutes2md -v weekly.docx weekly.md");
    println!();
    println!("RECOGNIZED TABLES:");
    println!("    progress   | タスク名/ID | 変更事項 | 変更内容 |   (one row per update)");
    println!("    issue      | 内容 / 課題内容 / 最新状況 / 対応方針 |  (key-value rows)");
    println!("    task       | ToDo / 担当者 / 期限 / 判定対象 |       (key-value rows)");
    println!();
    println!("Anything before the first '---' paragraph is treated as the metadata");
    println!("preamble (title, 日時, 場所, 参加者, プロジェクト名).");
}
