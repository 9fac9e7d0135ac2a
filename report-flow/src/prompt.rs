/// Builds the user turn from the document text and the operator's notes.
pub fn compose_prompt(document_text: &str, notes: &str) -> String {
    format!(
        "\nINPUT DATA:\n{document_text}\n\n---\nADDITIONAL NOTES FROM DOCTOR:\n{notes}\n---\n"
    )
}
