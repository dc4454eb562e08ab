//! Built-in example schemas, selectable from the CLI.
use serde_json::{json, Value};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    /// email + password
    Simple,
    /// nested personal / contact / professional sections
    Complex,
}

impl Sample {
    pub fn schema(self) -> Value {
        match self {
            Self::Simple => simple_schema(),
            Self::Complex => complex_schema(),
        }
    }
}

/// Flat login form: no sections.
pub fn simple_schema() -> Value {
    json!([
        {
            "type": "email",
            "name": "email",
            "label": "Email Address",
            "required": true,
            "placeholder": "Enter your email"
        },
        {
            "type": "password",
            "name": "password",
            "label": "Password",
            "required": true,
            "placeholder": "Enter your password"
        }
    ])
}

/// Three top-level sections, nesting up to three levels deep, with every
/// leaf type except `number`.
pub fn complex_schema() -> Value {
    json!([
        {
            "type": "section",
            "name": "personalInfo",
            "label": "Personal Information",
            "fields": [
                {"type": "text", "name": "firstName", "label": "First Name", "required": true, "placeholder": "Enter your first name"},
                {"type": "text", "name": "lastName", "label": "Last Name", "required": true, "placeholder": "Enter your last name"},
                {
                    "type": "section",
                    "name": "identification",
                    "label": "Identification Details",
                    "fields": [
                        {"type": "text", "name": "passportNumber", "label": "Passport Number", "placeholder": "Enter passport number"},
                        {
                            "type": "select",
                            "name": "idType",
                            "label": "ID Type",
                            "required": true,
                            "options": [
                                {"value": "passport", "label": "Passport"},
                                {"value": "drivingLicense", "label": "Driving License"},
                                {"value": "nationalId", "label": "National ID"}
                            ]
                        }
                    ]
                }
            ]
        },
        {
            "type": "section",
            "name": "contactInfo",
            "label": "Contact Information",
            "fields": [
                {"type": "email", "name": "email", "label": "Email", "required": true, "placeholder": "Enter your email"},
                {"type": "text", "name": "phone", "label": "Phone Number", "required": true, "placeholder": "+1 (xxx) xxx-xxxx"},
                {
                    "type": "section",
                    "name": "address",
                    "label": "Address Details",
                    "fields": [
                        {"type": "text", "name": "street", "label": "Street Address", "required": true, "placeholder": "Enter street address"},
                        {"type": "text", "name": "apartment", "label": "Apartment/Suite", "placeholder": "Apt, Suite, Unit (optional)"},
                        {
                            "type": "section",
                            "name": "location",
                            "label": "Location",
                            "fields": [
                                {"type": "text", "name": "city", "label": "City", "required": true, "placeholder": "Enter city"},
                                {"type": "text", "name": "state", "label": "State/Province", "required": true, "placeholder": "Enter state"},
                                {"type": "text", "name": "zipCode", "label": "ZIP/Postal Code", "required": true, "placeholder": "Enter ZIP code"},
                                {
                                    "type": "select",
                                    "name": "country",
                                    "label": "Country",
                                    "required": true,
                                    "options": [
                                        {"value": "us", "label": "United States"},
                                        {"value": "uk", "label": "United Kingdom"},
                                        {"value": "ca", "label": "Canada"},
                                        {"value": "au", "label": "Australia"},
                                        {"value": "de", "label": "Germany"}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        },
        {
            "type": "section",
            "name": "professionalInfo",
            "label": "Professional Information",
            "fields": [
                {
                    "type": "select",
                    "name": "employmentStatus",
                    "label": "Employment Status",
                    "required": true,
                    "options": [
                        {"value": "employed", "label": "Employed"},
                        {"value": "selfEmployed", "label": "Self-Employed"},
                        {"value": "unemployed", "label": "Unemployed"},
                        {"value": "student", "label": "Student"}
                    ]
                },
                {
                    "type": "section",
                    "name": "currentEmployment",
                    "label": "Current Employment",
                    "fields": [
                        {"type": "text", "name": "companyName", "label": "Company Name", "placeholder": "Enter company name"},
                        {"type": "text", "name": "jobTitle", "label": "Job Title", "placeholder": "Enter job title"},
                        {
                            "type": "textarea",
                            "name": "jobDescription",
                            "label": "Job Description",
                            "placeholder": "Describe your role and responsibilities",
                            "rows": 4
                        }
                    ]
                }
            ]
        }
    ])
}
