//! Plain-text layout of a report, one titled section per part of the record.

use report_flow::MedicalReport;
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub title: &'static str,
    pub body: String,
}

#[derive(Default)]
struct SectionBody {
    lines: Vec<String>,
}

impl SectionBody {
    fn field(&mut self, label: &str, value: &str) -> &mut Self {
        let value = if value.trim().is_empty() {
            NOT_AVAILABLE
        } else {
            value
        };
        self.lines.push(format!("{label}: {value}"));
        self
    }

    fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    fn heading(&mut self, text: &str) -> &mut Self {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(text.to_string());
        self
    }

    fn finish(&mut self, title: &'static str) -> RenderedSection {
        RenderedSection {
            title,
            body: std::mem::take(&mut self.lines).join("\n"),
        }
    }
}

pub fn render_sections(report: &MedicalReport) -> Vec<RenderedSection> {
    let mut b = SectionBody::default();
    let mut sections = Vec::with_capacity(13);

    let letter = &report.cover_letter;
    b.field("Patient Name", &letter.patient_name)
        .field("Date of Birth", &letter.date_of_birth)
        .field("Gender", &letter.gender)
        .field("Consulting Doctor", &letter.consulting_doctor)
        .field("Report Date", &letter.report_date)
        .line("")
        .line(letter.letter_text.clone());
    sections.push(b.finish("Cover Letter"));

    let main = &report.diagnoses.main_diagnosis;
    b.field("Main Diagnosis", &main.name).line(main.explanation.clone());
    if !report.diagnoses.comorbid_diagnoses.is_empty() {
        b.heading("Comorbid Diagnoses");
        for diagnosis in &report.diagnoses.comorbid_diagnoses {
            b.line(format!("- {}: {}", diagnosis.name, diagnosis.explanation));
        }
    }
    sections.push(b.finish("Diagnoses"));

    let exam = &report.physical_examination;
    b.field("Complaints", &exam.complaints)
        .field("Medical History", &exam.medical_history)
        .heading("Objective Status");
    for (label, value) in exam.objective_status.entries() {
        b.field(label, value);
    }
    sections.push(b.finish("Physical Examination"));

    for result in &report.laboratory_results {
        b.heading(&result.test_group)
            .line(result.purpose.clone())
            .field("Results Summary", &result.results_summary)
            .field("Interpretation", &result.interpretation);
    }
    sections.push(b.finish("Laboratory Results"));

    for exam in &report.instrumental_examinations {
        b.heading(&exam.exam_name)
            .field("Conclusion", &exam.conclusion)
            .field("Explanation", &exam.explanation);
    }
    sections.push(b.finish("Instrumental Examinations"));

    for consultation in &report.specialist_consultations {
        b.heading(&consultation.specialist)
            .field("Diagnosis", &consultation.diagnosis)
            .field("Comments", &consultation.comments);
    }
    sections.push(b.finish("Specialist Consultations"));

    let plan = &report.treatment_plan;
    b.field("Lifestyle Instructions", &plan.lifestyle_instructions)
        .heading("Medications");
    for medication in &plan.medications {
        b.line(format!("- {} ({})", medication.name, medication.duration))
            .field("  Purpose", &medication.purpose)
            .field("  Instructions", &medication.instructions);
    }
    sections.push(b.finish("Treatment Plan"));

    let nutrition = &report.nutrition_recommendations;
    b.heading("General");
    for rec in &nutrition.general {
        b.line(format!("- {}", rec.recommendation));
    }
    b.heading("Diagnosis-specific");
    for rec in &nutrition.diagnosis_specific {
        b.line(format!("- {}: {}", rec.diagnosis, rec.recommendation.recommendation));
    }
    sections.push(b.finish("Nutrition Recommendations"));

    let activity = &report.physical_activity;
    b.field("General Activity", &activity.general_activity)
        .heading("Exercises");
    for exercise in &activity.exercises {
        b.line(format!("- {}", exercise.name))
            .field("  Benefits", &exercise.benefits)
            .line(format!("  Frequency: {} ({})", exercise.frequency, exercise.duration))
            .field("  Precautions", &exercise.precautions);
    }
    sections.push(b.finish("Physical Activity"));

    for tip in &report.sleep_hygiene {
        b.line(format!("- {}: {}", tip.recommendation, tip.explanation));
    }
    sections.push(b.finish("Sleep Hygiene"));

    for improvement in &report.expected_improvements {
        b.heading(&improvement.condition)
            .line(improvement.expected_effect.clone());
    }
    sections.push(b.finish("Expected Improvements"));

    let follow_up = &report.follow_up_plan;
    b.field("Specialist Visits", &follow_up.specialist_visits)
        .field("Additional Tests", &follow_up.additional_tests)
        .field("Timing", &follow_up.timing);
    sections.push(b.finish("Follow-up Plan"));

    let conclusion = &report.final_conclusion;
    b.line(conclusion.summary.clone())
        .line("")
        .line(conclusion.closing_message.clone());
    sections.push(b.finish("Final Conclusion"));

    sections
}

/// All sections as one document.
pub fn render_report(report: &MedicalReport) -> String {
    render_sections(report)
        .into_iter()
        .map(|section| format!("## {}\n\n{}\n", section.title, section.body))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT_JSON: &str =
        include_str!("../../report-flow/src/fixtures/sample_report.json");

    fn sample() -> MedicalReport {
        serde_json::from_str(SAMPLE_REPORT_JSON).unwrap()
    }

    #[test]
    fn sections_follow_report_order() {
        let titles: Vec<_> = render_sections(&sample())
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Cover Letter",
                "Diagnoses",
                "Physical Examination",
                "Laboratory Results",
                "Instrumental Examinations",
                "Specialist Consultations",
                "Treatment Plan",
                "Nutrition Recommendations",
                "Physical Activity",
                "Sleep Hygiene",
                "Expected Improvements",
                "Follow-up Plan",
                "Final Conclusion",
            ]
        );
    }

    #[test]
    fn empty_fields_render_as_not_available() {
        let mut report = sample();
        report.cover_letter.gender = String::new();
        report.physical_examination.objective_status.spo2 = "  ".to_string();

        let sections = render_sections(&report);

        assert!(sections[0].body.contains("Gender: N/A"));
        assert!(sections[2].body.contains("SpO2: N/A"));
    }

    #[test]
    fn comorbid_block_only_when_present() {
        let mut report = sample();
        let with = render_sections(&report);
        assert!(with[1].body.contains("Comorbid Diagnoses\n- Dyslipidaemia:"));

        report.diagnoses.comorbid_diagnoses.clear();
        let without = render_sections(&report);
        assert!(!without[1].body.contains("Comorbid Diagnoses"));
    }

    #[test]
    fn list_entries_keep_generation_order() {
        let body = &render_sections(&sample())[3].body;
        let blood = body.find("Complete blood count").unwrap();
        let lipids = body.find("Lipid panel").unwrap();
        assert!(blood < lipids);
    }

    #[test]
    fn full_document_has_every_heading() {
        let text = render_report(&sample());
        assert!(text.starts_with("## Cover Letter\n\nPatient Name: Ivanova Anna Petrovna"));
        assert_eq!(text.matches("## ").count(), 13);
        assert!(text.contains("Timing: In 3 months"));
    }
}
