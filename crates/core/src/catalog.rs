//! Bundled fallback catalog.
//!
//! The client ships with a small built-in card set so a failed catalog fetch
//! degrades to a usable deck instead of an error screen. The `seed` binary in
//! the storage crate loads the same set into a fresh database.

use crate::model::{Card, CardContent, CardId, Category, Difficulty, Hotspot, ImageRef};

/// Default stack name for the bundled cards.
pub const BUNDLED_STACK: &str = "ent-core";

fn image(raw: &str) -> ImageRef {
    ImageRef::parse(raw).expect("bundled image refs are valid")
}

fn card(id: &str, category: Category, difficulty: Difficulty, seq: u32, content: CardContent) -> Card {
    Card {
        id: CardId::new(id),
        stack: BUNDLED_STACK.to_string(),
        category,
        difficulty,
        seq,
        content,
    }
}

/// The built-in study deck, ordered by `seq`.
#[must_use]
pub fn bundled() -> Vec<Card> {
    vec![
        card(
            "oto-001",
            Category::Otology,
            Difficulty::Easy,
            0,
            CardContent::Quiz {
                question: "Which ossicle articulates with the oval window?".to_string(),
                options: vec![
                    "Malleus".to_string(),
                    "Incus".to_string(),
                    "Stapes".to_string(),
                    "Lenticular process".to_string(),
                ],
                answer_index: 2,
                explanation: Some(
                    "The stapes footplate sits in the oval window and transmits \
                     vibration into the scala vestibuli."
                        .to_string(),
                ),
            },
        ),
        card(
            "lar-001",
            Category::Laryngology,
            Difficulty::Medium,
            1,
            CardContent::Flashcard {
                front: "Name the only abductor of the vocal folds.".to_string(),
                back: "Posterior cricoarytenoid muscle.".to_string(),
            },
        ),
        card(
            "rhi-001",
            Category::Rhinology,
            Difficulty::Medium,
            2,
            CardContent::FillBlank {
                text: "The ___ sinus drains into the superior meatus.".to_string(),
                answer: "posterior ethmoid".to_string(),
            },
        ),
        card(
            "oto-002",
            Category::Otology,
            Difficulty::Hard,
            3,
            CardContent::AnatomyHotspot {
                image: image("/assets/images/tympanic-membrane.svg"),
                hotspots: vec![
                    Hotspot {
                        label: "Umbo".to_string(),
                        x: 0.52,
                        y: 0.58,
                        detail: Some("Tip of the malleus handle.".to_string()),
                    },
                    Hotspot {
                        label: "Pars flaccida".to_string(),
                        x: 0.48,
                        y: 0.18,
                        detail: Some(
                            "Retraction pockets here may form cholesteatoma.".to_string(),
                        ),
                    },
                ],
            },
        ),
        card(
            "hn-001",
            Category::HeadNeck,
            Difficulty::Hard,
            4,
            CardContent::SurgicalSteps {
                title: "Open tracheostomy".to_string(),
                steps: vec![
                    "Horizontal skin incision midway between cricoid and sternal notch"
                        .to_string(),
                    "Divide platysma, separate strap muscles in the midline".to_string(),
                    "Divide or retract the thyroid isthmus".to_string(),
                    "Open the trachea between the 2nd and 3rd rings".to_string(),
                    "Insert and secure the tracheostomy tube".to_string(),
                ],
            },
        ),
        card(
            "rhi-002",
            Category::Rhinology,
            Difficulty::Easy,
            5,
            CardContent::ImageQuiz {
                image: image("/assets/images/nasal-septum.svg"),
                question: "Identify the cartilage forming the anterior septum.".to_string(),
                options: vec![
                    "Quadrangular cartilage".to_string(),
                    "Vomer".to_string(),
                    "Perpendicular plate of ethmoid".to_string(),
                    "Medial crus".to_string(),
                ],
                answer_index: 0,
            },
        ),
        card(
            "lar-002",
            Category::Laryngology,
            Difficulty::Easy,
            6,
            CardContent::AnimatedText {
                lines: vec![
                    "Reinke's space is the superficial lamina propria.".to_string(),
                    "Chronic irritation causes polypoid edema there.".to_string(),
                    "Smoking cessation is the first-line treatment.".to_string(),
                ],
            },
        ),
        card(
            "hn-002",
            Category::HeadNeck,
            Difficulty::Medium,
            7,
            CardContent::Quiz {
                question: "The most common site of salivary gland tumors is the:".to_string(),
                options: vec![
                    "Parotid gland".to_string(),
                    "Submandibular gland".to_string(),
                    "Sublingual gland".to_string(),
                    "Minor salivary glands".to_string(),
                ],
                answer_index: 0,
                explanation: Some(
                    "About 80% of salivary tumors arise in the parotid, and most \
                     of those are benign pleomorphic adenomas."
                        .to_string(),
                ),
            },
        ),
        card(
            "oto-003",
            Category::Otology,
            Difficulty::Medium,
            8,
            CardContent::Flashcard {
                front: "Where is the organ of Corti located?".to_string(),
                back: "On the basilar membrane within the scala media.".to_string(),
            },
        ),
        card(
            "rhi-003",
            Category::Rhinology,
            Difficulty::Hard,
            9,
            CardContent::Quiz {
                question: "Which artery is the usual source of posterior epistaxis?".to_string(),
                options: vec![
                    "Anterior ethmoidal artery".to_string(),
                    "Sphenopalatine artery".to_string(),
                    "Greater palatine artery".to_string(),
                    "Superior labial artery".to_string(),
                ],
                answer_index: 1,
                explanation: None,
            },
        ),
    ]
}
