//! Static health tips (according to WHO) keyed by predicted category.

use crate::types::DiabetesStatus;
use serde::Serialize;

/// Heading shown above the tip block.
pub const HEADING: &str = "Health Tips (According to WHO)";

/// One block of tips for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthTips {
    pub title: &'static str,
    pub tips: &'static [&'static str],
}

const DIABETES: HealthTips = HealthTips {
    title: "Tips for managing Diabetes",
    tips: &[
        "Eat a healthy diet: Focus on fruits, vegetables, whole grains, lean protein, and low-fat dairy. Limit sugary drinks, processed foods, and saturated and trans fats.",
        "Be physically active: Aim for at least 150 minutes of moderate-intensity aerobic activity or 75 minutes of vigorous-intensity aerobic activity per week.",
        "Maintain a healthy weight: Losing even a small amount of weight can improve blood sugar control.",
        "Take medications as prescribed: If your doctor has prescribed medication for your diabetes, take it as directed.",
        "Monitor your blood sugar levels regularly: This will help you understand how your diet, activity, and medications affect your blood sugar.",
        "See your doctor regularly: Regular check-ups are important for monitoring your diabetes and preventing complications.",
    ],
};

const PRE_DIABETES: HealthTips = HealthTips {
    title: "Tips for preventing Diabetes (for Pre-Diabetes)",
    tips: &[
        "Lose weight if you are overweight: Losing 5-10% of your body weight can significantly reduce your risk of developing type 2 diabetes.",
        "Eat a healthy diet: Similar to managing diabetes, focus on nutrient-rich foods and limit unhealthy ones.",
        "Get regular physical activity: Aim for at least 150 minutes of moderate-intensity aerobic activity per week.",
        "Don't smoke: Smoking increases the risk of developing type 2 diabetes and other health problems.",
        "Manage stress: Stress can affect blood sugar levels. Find healthy ways to manage stress.",
    ],
};

const NON_DIABETES: HealthTips = HealthTips {
    title: "Tips for maintaining Non-Diabetes status",
    tips: &[
        "Continue healthy eating habits: Maintain a balanced diet rich in fruits, vegetables, and whole grains.",
        "Stay physically active: Regular exercise is crucial for overall health and preventing many chronic diseases, including diabetes.",
        "Maintain a healthy weight: Keep your weight in a healthy range for your height and body type.",
        "Get enough sleep: Aim for 7-9 hours of quality sleep per night.",
        "Manage stress: Find healthy ways to cope with stress.",
        "Regular check-ups: See your doctor for regular check-ups to monitor your overall health.",
    ],
};

/// Tips for a predicted category.
pub fn tips_for(status: DiabetesStatus) -> &'static HealthTips {
    match status {
        DiabetesStatus::Diabetes => &DIABETES,
        DiabetesStatus::PreDiabetes => &PRE_DIABETES,
        DiabetesStatus::NonDiabetes => &NON_DIABETES,
    }
}

/// Tips for a category label.
///
/// `"Diabetes"` and `"Pre-Diabetes"` match exactly; anything else gets the
/// Non-Diabetes block.
pub fn tips_for_label(label: &str) -> &'static HealthTips {
    match label {
        "Diabetes" => &DIABETES,
        "Pre-Diabetes" => &PRE_DIABETES,
        _ => &NON_DIABETES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_distinct_tips() {
        let titles: Vec<&str> = DiabetesStatus::ALL.iter().map(|s| tips_for(*s).title).collect();
        assert_eq!(
            titles,
            vec![
                "Tips for managing Diabetes",
                "Tips for maintaining Non-Diabetes status",
                "Tips for preventing Diabetes (for Pre-Diabetes)",
            ]
        );
        for status in DiabetesStatus::ALL {
            assert!(!tips_for(status).tips.is_empty());
        }
    }

    #[test]
    fn label_lookup_agrees_with_status_lookup() {
        for status in DiabetesStatus::ALL {
            assert_eq!(tips_for_label(status.label()), tips_for(status));
        }
    }

    #[test]
    fn label_lookup_is_exact() {
        assert_eq!(tips_for_label("diabetes"), tips_for(DiabetesStatus::NonDiabetes));
        assert_eq!(tips_for_label("Pre-Diabetes "), tips_for(DiabetesStatus::NonDiabetes));
        assert_eq!(tips_for_label(""), tips_for(DiabetesStatus::NonDiabetes));
    }
}
