use crate::export::ExportError;
use crate::session::record::SessionRecord;

pub const RESULT_COLUMNS: [&str; 18] = [
    "participant_id",
    "age",
    "gender",
    "field_of_study",
    "gpa",
    "creative_mood",
    "current_mood",
    "artistic_experience",
    "group",
    "drawing1_path",
    "caption1",
    "drawing2_path",
    "caption2",
    "ai_interactions",
    "self_creativity",
    "satisfaction",
    "ai_influence",
    "submission_time",
];

pub fn header_line() -> String {
    RESULT_COLUMNS.join(",")
}

pub fn encode_row(
    record: &SessionRecord,
    drawing_paths: &[String; 2],
    submission_time: &str,
) -> Result<String, ExportError> {
    let demographics = record
        .demographics
        .as_ref()
        .ok_or_else(|| missing("demographics"))?;
    let self_assessment = record
        .self_assessment
        .as_ref()
        .ok_or_else(|| missing("self_assessment"))?;
    let final_assessment = record
        .final_assessment
        .as_ref()
        .ok_or_else(|| missing("final_assessment"))?;
    let interactions = serde_json::to_string(&record.ai_interactions)
        .map_err(|err| ExportError::Encode(err.to_string()))?;

    let cells = [
        record.participant_id.as_str().to_string(),
        demographics.age.to_string(),
        demographics.gender.to_string(),
        demographics.field_of_study.clone().unwrap_or_default(),
        demographics
            .gpa
            .map(|gpa| format!("{gpa:.2}"))
            .unwrap_or_default(),
        self_assessment
            .creative_mood
            .map(|mood| mood.to_string())
            .unwrap_or_default(),
        self_assessment.current_mood.to_string(),
        self_assessment.artistic_experience.to_string(),
        record.group.to_string(),
        drawing_paths[0].clone(),
        record.caption(0).unwrap_or("").to_string(),
        drawing_paths[1].clone(),
        record.caption(1).unwrap_or("").to_string(),
        interactions,
        final_assessment.self_creativity.to_string(),
        final_assessment.satisfaction.to_string(),
        final_assessment.ai_influence.to_string(),
        submission_time.to_string(),
    ];

    Ok(cells
        .iter()
        .map(|cell| escape_cell(cell))
        .collect::<Vec<_>>()
        .join(","))
}

fn missing(field: &str) -> ExportError {
    ExportError::Encode(format!("record is missing `{field}`"))
}

pub(crate) fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
