//! Typed medical report produced by the generation service.
//!
//! Every field is required at decode time: a reply missing any substructure
//! fails to decode as a whole. Lists keep the order the service produced.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalReport {
    pub cover_letter: CoverLetter,
    pub diagnoses: Diagnoses,
    pub physical_examination: PhysicalExamination,
    pub laboratory_results: Vec<LaboratoryResult>,
    pub instrumental_examinations: Vec<InstrumentalExamination>,
    pub specialist_consultations: Vec<SpecialistConsultation>,
    pub treatment_plan: TreatmentPlan,
    pub nutrition_recommendations: NutritionRecommendations,
    pub physical_activity: PhysicalActivity,
    pub sleep_hygiene: Vec<SleepHygiene>,
    pub expected_improvements: Vec<ExpectedImprovement>,
    pub follow_up_plan: FollowUpPlan,
    pub final_conclusion: FinalConclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub patient_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub consulting_doctor: String,
    pub report_date: String,
    pub letter_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub name: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnoses {
    pub main_diagnosis: Diagnosis,
    pub comorbid_diagnoses: Vec<Diagnosis>,
}

/// Fixed-key vital signs and organ-system findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveStatus {
    pub height: String,
    pub weight: String,
    pub bmi: String,
    pub blood_pressure: String,
    pub pulse: String,
    pub spo2: String,
    pub cardiovascular: String,
    pub respiratory: String,
    pub abdomen: String,
}

impl ObjectiveStatus {
    /// Field labels and values in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("Height", &self.height),
            ("Weight", &self.weight),
            ("BMI", &self.bmi),
            ("Blood Pressure", &self.blood_pressure),
            ("Pulse", &self.pulse),
            ("SpO2", &self.spo2),
            ("Cardiovascular", &self.cardiovascular),
            ("Respiratory", &self.respiratory),
            ("Abdomen", &self.abdomen),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalExamination {
    pub complaints: String,
    pub medical_history: String,
    pub objective_status: ObjectiveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaboratoryResult {
    pub test_group: String,
    pub purpose: String,
    pub results_summary: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentalExamination {
    pub exam_name: String,
    pub conclusion: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistConsultation {
    pub specialist: String,
    pub diagnosis: String,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub purpose: String,
    pub instructions: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub lifestyle_instructions: String,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: String,
    pub reason: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSpecificRecommendation {
    pub diagnosis: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionRecommendations {
    pub general: Vec<Recommendation>,
    pub diagnosis_specific: Vec<DiagnosisSpecificRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub benefits: String,
    pub frequency: String,
    pub duration: String,
    pub precautions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalActivity {
    pub general_activity: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepHygiene {
    pub recommendation: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedImprovement {
    pub condition: String,
    pub expected_effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpPlan {
    pub specialist_visits: String,
    pub additional_tests: String,
    pub timing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalConclusion {
    pub summary: String,
    pub closing_message: String,
}
