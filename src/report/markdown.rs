use crate::analyze::StageMetricsAnalysis;
use crate::metrics::{format_percentage, TeamMetrics};
use crate::model::{Error, Result};
use crate::report::graphite::slug;
use chrono::{DateTime, Local};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;
use std::path::{Path, PathBuf};

pub trait MarkdownReport {
    fn report_render(
        &self,
        analysis: &StageMetricsAnalysis,
        generated_at: &DateTime<Local>,
    ) -> Result<String>;

    fn report_create(
        &self,
        analysis: &StageMetricsAnalysis,
        dir: &Path,
        generated_at: &DateTime<Local>,
    ) -> Result<PathBuf>;
}

impl MarkdownReport for TeamMetrics {
    fn report_render(
        &self,
        analysis: &StageMetricsAnalysis,
        generated_at: &DateTime<Local>,
    ) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1(format!("{} ({})", self.team_name, generated_at.format("%d.%m.%Y")).as_str());
        doc.add_stage_table(self)?;
        doc.add_notes("Well", &analysis.well);
        doc.add_notes("Needs Improvement", &analysis.needs_improvement);

        Ok(doc.render())
    }

    fn report_create(
        &self,
        analysis: &StageMetricsAnalysis,
        dir: &Path,
        generated_at: &DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = dir.join(format!("{}.md", slug(&self.team_name)));
        fs::write(&path, self.report_render(analysis, generated_at)?)?;
        Ok(path)
    }
}

trait MarkdownExt {
    fn add_stage_table(&mut self, team: &TeamMetrics) -> Result<()>;
    fn add_notes(&mut self, title: &str, notes: &[String]);
}

impl MarkdownExt for Markdown {
    fn add_stage_table(&mut self, team: &TeamMetrics) -> Result<()> {
        self.header2("Stages".to_string());

        let header = ["Stage", "Pass", "Fail", "Total", "Pass %", "Threshold"]
            .iter()
            .enumerate()
            .map(|(index, title)| {
                let alignment = if index == 0 {
                    HeadingAlignment::Left
                } else {
                    HeadingAlignment::Right
                };
                Heading::new(title.to_string(), Some(alignment))
            })
            .collect::<Vec<_>>();

        let table = team
            .stages
            .values()
            .map(|stage| {
                vec![
                    stage.stage_name.clone(),
                    stage.pass_count.to_string(),
                    stage.fail_count.to_string(),
                    stage.total_count.to_string(),
                    format!("{}%", format_percentage(stage.pass_percentage())),
                    format!("{}%", stage.stage_key.acceptable_success_rate()),
                ]
            })
            .collect::<Vec<_>>();

        let mut md_table = MarkdownTable::new(table);
        md_table.with_headings(header);
        let rendered = md_table
            .as_markdown()
            .map_err(|_| Error::Report(format!("stage table of team '{}'", team.team_name)))?;
        self.paragraph(rendered);
        Ok(())
    }

    fn add_notes(&mut self, title: &str, notes: &[String]) {
        self.header2(title.to_string());
        if notes.is_empty() {
            self.paragraph("_Nothing to report._".to_string());
            return;
        }
        // Notes are already list items indented by two spaces per level.
        let list = notes
            .iter()
            .map(|note| note.strip_prefix("  ").unwrap_or(note))
            .collect::<Vec<_>>()
            .join("\n");
        self.paragraph(list);
    }
}
