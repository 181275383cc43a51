use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::delegation::MemberForm;

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    performance: f64,
    growth: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skills: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    projects: Option<String>,
}

impl RosterRow {
    fn into_form(self) -> MemberForm {
        MemberForm {
            name: self.name,
            performance: self.performance,
            growth: self.growth,
            skills_raw: pairs_to_lines(self.skills.as_deref()),
            projects_raw: pairs_to_lines(self.projects.as_deref()),
        }
    }
}

/// Parse roster rows into member forms, paired with their 1-based data line.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<(usize, MemberForm)>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut forms = Vec::new();
    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        forms.push((index + 1, row.into_form()));
    }
    Ok(forms)
}

/// `a:1;b:2` becomes one pair per line, the format intake expects.
fn pairs_to_lines(raw: Option<&str>) -> String {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    })
    .unwrap_or_default()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
