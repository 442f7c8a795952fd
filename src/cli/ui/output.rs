use console::style;

use crate::grouping::LeafGroup;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Planned group: label, size, then the member names
    pub fn group(&self, label: &str, group: &LeafGroup) {
        println!(
            "{} {} {}",
            style("▸").cyan(),
            style(label).bold(),
            style(format!("({} under {})", group.len(), group.key.ancestor_path)).dim()
        );
        for leaf in &group.leaves {
            println!("    {} {}", leaf.name, style(leaf.node).dim());
        }
    }

    /// Indented document outline, kind and id dimmed
    pub fn outline(&self, rendered: &str) {
        for line in rendered.lines() {
            match line.rfind(" [") {
                Some(at) => println!("{}{}", &line[..at], style(&line[at..]).dim()),
                None => println!("{}", line),
            }
        }
    }

    pub fn prompt(&self) {
        print!("{} ", style("planwrap>").cyan().bold());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
