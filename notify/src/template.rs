//! Rendering of the guardian alert email.

use chrono::Utc;

use crate::Alert;

pub fn subject(alert: &Alert) -> String {
    format!(
        "MindCare alert: concerning pattern detected - {}",
        alert.student_name
    )
}

/// Plain-text body of the guardian alert.
pub fn text_body(alert: &Alert) -> String {
    format!(
        "MENTAL WELLNESS ALERT - MindCare\n\
        \n\
        CONCERNING PATTERN DETECTED\n\
        \n\
        Dear {guardian},\n\
        \n\
        We are contacting you because MindCare has detected a concerning \
        pattern in {student}'s emotional state.\n\
        \n\
        PATTERN DETECTED:\n\
        {details}\n\
        \n\
        IMMEDIATE RECOMMENDATIONS:\n\
        - Talk with {student} calmly and without judgment about how they feel\n\
        - Offer emotional support and let them know they are safe with you\n\
        - Consider seeking professional help if the pattern continues\n\
        - Keep communication open and check in on their wellbeing regularly\n\
        \n\
        NEED IMMEDIATE HELP?\n\
        If {student} is in immediate danger or has expressed thoughts of \
        self-harm, call the crisis line at 988 (available 24/7).\n\
        \n\
        ABOUT MindCare:\n\
        MindCare is a mental wellness app that helps young people monitor \
        their emotional state and reach support tools. This alert was \
        generated automatically on {date}.\n\
        Please do not reply to this email.\n",
        guardian = alert.guardian_name,
        student = alert.student_name,
        details = alert.details,
        date = Utc::now().format("%Y-%m-%d %H:%M UTC"),
    )
}

/// HTML body of the guardian alert.
pub fn html_body(alert: &Alert) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
        <h1>Mental Wellness Alert - MindCare</h1>\
        <h2>Concerning Pattern Detected</h2>\
        <p>Dear {guardian},</p>\
        <p>We are contacting you because MindCare has detected a concerning \
        pattern in {student}'s emotional state.</p>\
        <p><strong>Pattern detected:</strong> {details}</p>\
        <h3>Immediate recommendations</h3>\
        <ul>\
        <li>Talk with {student} calmly and without judgment about how they feel</li>\
        <li>Offer emotional support and let them know they are safe with you</li>\
        <li>Consider seeking professional help if the pattern continues</li>\
        <li>Keep communication open and check in on their wellbeing regularly</li>\
        </ul>\
        <h3>Need immediate help?</h3>\
        <p>If {student} is in immediate danger or has expressed thoughts of \
        self-harm, call the crisis line at <strong>988</strong> (24/7).</p>\
        <p style=\"color: #718096; font-size: 14px;\">This email was generated \
        automatically by MindCare. Please do not reply.</p>\
        </div>",
        guardian = alert.guardian_name,
        student = alert.student_name,
        details = alert.details,
    )
}
