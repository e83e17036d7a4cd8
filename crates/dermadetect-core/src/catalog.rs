//! Selectable symptom and lesion-characteristic tags shown in the
//! enrichment form, with the detail text displayed when a tag is tapped.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TagSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TagDetail {
    pub title: &'static str,
    pub description: &'static str,
    pub severity: TagSeverity,
}

pub const SYMPTOMS: &[TagDetail] = &[
    TagDetail {
        title: "Painful",
        description: "The lesion causes pain or discomfort to the touch. This may indicate inflammation, infection, or deeper tissue involvement.",
        severity: TagSeverity::High,
    },
    TagDetail {
        title: "Itchy",
        description: "The area feels itchy or pruritic. This is common in allergic reactions, eczema, or certain infections.",
        severity: TagSeverity::Medium,
    },
    TagDetail {
        title: "Burning",
        description: "A burning sensation in the affected area. This may indicate nerve involvement or chemical irritation.",
        severity: TagSeverity::High,
    },
    TagDetail {
        title: "Bleeding",
        description: "The lesion is actively bleeding or has bled recently. This requires immediate medical attention.",
        severity: TagSeverity::High,
    },
    TagDetail {
        title: "Spreading Rapidly",
        description: "The lesion is growing or spreading quickly. Rapid growth may indicate malignancy or aggressive infection.",
        severity: TagSeverity::High,
    },
    TagDetail {
        title: "Fever Present",
        description: "Patient has an elevated body temperature. This may indicate systemic infection or inflammatory response.",
        severity: TagSeverity::High,
    },
];

pub const LESION_CHARACTERISTICS: &[TagDetail] = &[
    TagDetail {
        title: "Raised",
        description: "The lesion protrudes above the surrounding skin level. This can indicate various conditions from benign to malignant.",
        severity: TagSeverity::Medium,
    },
    TagDetail {
        title: "Flaky",
        description: "The skin surface shows scaling or flaking. This is common in dry skin conditions, fungal infections, or psoriasis.",
        severity: TagSeverity::Low,
    },
    TagDetail {
        title: "Fluid-filled",
        description: "The lesion contains clear or cloudy fluid. This may be a blister, vesicle, or cyst requiring careful evaluation.",
        severity: TagSeverity::Medium,
    },
    TagDetail {
        title: "Irregular Borders",
        description: "The edges of the lesion are not smooth or well-defined. Irregular borders are concerning for malignancy.",
        severity: TagSeverity::High,
    },
    TagDetail {
        title: "Multiple Colors",
        description: "The lesion shows variation in color within the same area. Color variation can indicate malignancy.",
        severity: TagSeverity::High,
    },
];

pub fn symptom(title: &str) -> Option<&'static TagDetail> {
    SYMPTOMS.iter().find(|t| t.title == title)
}

pub fn lesion_characteristic(title: &str) -> Option<&'static TagDetail> {
    LESION_CHARACTERISTICS.iter().find(|t| t.title == title)
}
