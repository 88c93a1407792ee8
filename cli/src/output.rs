//! Output formatting

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON or YAML, or as a table of `rows`
    pub fn print<T, R>(&self, data: &T, rows: impl IntoIterator<Item = R>) -> Result<()>
    where
        T: Serialize,
        R: Tabled,
    {
        println!("{}", self.render(data, rows)?);
        Ok(())
    }

    pub fn render<T, R>(&self, data: &T, rows: impl IntoIterator<Item = R>) -> Result<String>
    where
        T: Serialize,
        R: Tabled,
    {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        id: u64,
        name: &'static str,
    }

    #[test]
    fn test_render_formats() {
        let rows = vec![Row { id: 1, name: "Payroll" }];
        let table = OutputFormat::Table.render(&rows, rows.iter().map(|r| Row { id: r.id, name: r.name })).unwrap();
        assert!(table.contains("Payroll"));
        assert!(table.contains("name"));

        let json = OutputFormat::Json.render(&rows, Vec::<Row>::new()).unwrap();
        assert!(json.contains("\"name\": \"Payroll\""));

        let yaml = OutputFormat::Yaml.render(&rows, Vec::<Row>::new()).unwrap();
        assert!(yaml.contains("name: Payroll"));
    }
}
