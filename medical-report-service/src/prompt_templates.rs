//! Static prompt material: the system instruction describing the report
//! schema, and the recognised text of the sample document that stands in for
//! an uploaded file.

pub const SYSTEM_INSTRUCTION: &str = r#"You are an experienced internal medicine physician preparing a patient-facing consultation report.

Read the INPUT DATA (recognised text of the patient's medical documents) and the ADDITIONAL NOTES FROM DOCTOR.
Base every statement on the input. Where the input is silent, write "Not reported" instead of inventing values.
Explain medical terms in plain language the patient can understand.

Respond with a single JSON document and nothing else. It must contain exactly these keys:

{
  "cover_letter": {
    "patient_name": "", "date_of_birth": "", "gender": "",
    "consulting_doctor": "", "report_date": "", "letter_text": ""
  },
  "diagnoses": {
    "main_diagnosis": { "name": "", "explanation": "" },
    "comorbid_diagnoses": [{ "name": "", "explanation": "" }]
  },
  "physical_examination": {
    "complaints": "", "medical_history": "",
    "objective_status": {
      "height": "", "weight": "", "bmi": "", "blood_pressure": "", "pulse": "",
      "spo2": "", "cardiovascular": "", "respiratory": "", "abdomen": ""
    }
  },
  "laboratory_results": [
    { "test_group": "", "purpose": "", "results_summary": "", "interpretation": "" }
  ],
  "instrumental_examinations": [{ "exam_name": "", "conclusion": "", "explanation": "" }],
  "specialist_consultations": [{ "specialist": "", "diagnosis": "", "comments": "" }],
  "treatment_plan": {
    "lifestyle_instructions": "",
    "medications": [{ "name": "", "purpose": "", "instructions": "", "duration": "" }]
  },
  "nutrition_recommendations": {
    "general": [{ "recommendation": "", "reason": "", "frequency": "" }],
    "diagnosis_specific": [{ "diagnosis": "", "recommendation": "", "reason": "", "frequency": "" }]
  },
  "physical_activity": {
    "general_activity": "",
    "exercises": [{ "name": "", "benefits": "", "frequency": "", "duration": "", "precautions": "" }]
  },
  "sleep_hygiene": [{ "recommendation": "", "explanation": "" }],
  "expected_improvements": [{ "condition": "", "expected_effect": "" }],
  "follow_up_plan": { "specialist_visits": "", "additional_tests": "", "timing": "" },
  "final_conclusion": { "summary": "", "closing_message": "" }
}

Every value is a string. Lists may be empty, but main_diagnosis is always required."#;

pub const SAMPLE_DOCUMENT_TEXT: &str = r#"OUTPATIENT EXAMINATION RECORD
Patient: Ivanova Anna Petrovna, female, date of birth 14.03.1968
Attending physician: Dr. Sokolov
Date of visit: 20.05.2024

Complaints: morning headaches in the occipital region, fatigue by the end of the day, occasional dizziness.
History: arterial hypertension for 6 years, takes enalapril irregularly. Smokes 5 cigarettes a day.
Family history: father had a myocardial infarction at 58.

Objective status: height 165 cm, weight 76.5 kg, BMI 28.1. BP 152/94 mmHg (right arm), 148/92 mmHg (left arm).
Pulse 78 bpm, regular. SpO2 98%. Heart sounds rhythmic, accent of the II tone over the aorta.
Vesicular breathing, no rales. Abdomen soft, non-tender. No peripheral oedema.

Complete blood count: Hb 134 g/L, WBC 6.2 x10^9/L, PLT 248 x10^9/L, ESR 12 mm/h.
Biochemistry: glucose 5.6 mmol/L, creatinine 84 umol/L, eGFR 71 mL/min/1.73m2, potassium 4.3 mmol/L.
Lipid panel: total cholesterol 6.4 mmol/L, LDL 4.1 mmol/L, HDL 1.2 mmol/L, triglycerides 1.9 mmol/L.
Urinalysis: protein absent, microalbuminuria 28 mg/day.

ECG: sinus rhythm 76 bpm, signs of left ventricular hypertrophy (Sokolow-Lyon 37 mm).
Echocardiography: LV wall thickness 11-12 mm, EF 62%, grade I diastolic dysfunction.
Carotid ultrasound: intima-media thickness 0.9 mm, no plaques.

Cardiologist: arterial hypertension stage II, grade 1, risk 3. Recommended combination therapy and statin.
Ophthalmologist: hypertensive angiopathy of the retina."#;
