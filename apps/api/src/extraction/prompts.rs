// Record extraction prompt templates.

pub const RECORD_EXTRACTION_SYSTEM: &str = "\
You extract student result tables from documents. \
You MUST respond with a JSON array only: no markdown fences, no explanations. \
Copy values exactly as they appear; never compute or correct a score.";

pub const RECORD_EXTRACTION_PROMPT: &str = r#"The following is a document containing student scores:
----
{document_text}
----
Extract all data from tables containing student records.
For each row, identify the Serial Number (sn), Registration Number (regNo),
Continuous Assessment (ca), Exam score (exam), and Total score (total).

If the Serial Number is missing or empty, automatically assign it based on the row index (starting from 1).
Return the data as a JSON array of objects, where each object represents one student record with these fields: sn, regNo, ca, exam, and total.

Do not include blank or empty rows. Only return the JSON data, nothing else."#;

/// Fills the extraction prompt with the document's plain text.
pub fn extraction_prompt(document_text: &str) -> String {
    RECORD_EXTRACTION_PROMPT.replace("{document_text}", document_text.trim())
}
