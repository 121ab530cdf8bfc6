//! Persona-to-document rendering.

use tracing::info;

use persona_core::persona::{Persona, PersonaPoint};

use crate::layout::{paginate, Block, Evidence, PageLayout};

/// Insight sections in presentation order.
fn sections(persona: &Persona) -> [(&'static str, &[PersonaPoint]); 6] {
    [
        ("Interests & Hobbies", &persona.interests_and_hobbies),
        ("Personality Traits", &persona.personality_traits),
        ("Values & Beliefs", &persona.values_and_beliefs),
        ("Communication Style", &persona.communication_style),
        ("Goals & Motivations", &persona.goals_and_motivations),
        (
            "Pain Points & Frustrations",
            &persona.pain_points_and_frustrations,
        ),
    ]
}

/// Convert a persona into its layout blocks.
fn persona_blocks(persona: &Persona) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("Deep Persona Report".to_string()),
        Block::Heading(format!("u/{}", persona.username)),
        Block::Rule,
        Block::Heading("Summary & Profile".to_string()),
        Block::Paragraph(persona.summary_bio.clone()),
        Block::Heading("Demographics".to_string()),
    ];

    let demo = &persona.demographics;
    for (label, value) in [
        ("Age", &demo.age),
        ("Gender", &demo.gender),
        ("Location", &demo.location),
        ("Occupation", &demo.occupation),
        ("Education", &demo.education),
    ] {
        blocks.push(Block::Field(label.to_string(), field_value(value)));
    }

    blocks.push(Block::Heading("Psychographics".to_string()));
    let psycho = &persona.psychographics;
    for (label, value) in [
        ("MBTI Type", &psycho.mbti_type),
        ("Archetype", &psycho.archetype),
        ("Tech Adoption", &psycho.tech_adoption_tier),
    ] {
        blocks.push(Block::Field(label.to_string(), field_value(value)));
    }

    blocks.push(Block::Heading("Detailed Insights".to_string()));
    for (title, points) in sections(persona) {
        if points.is_empty() {
            continue;
        }
        blocks.push(Block::SubHeading(title.to_string()));
        for point in points {
            blocks.push(Block::Bullet(point.point.clone()));
            if let Some(first) = point.evidence.first() {
                blocks.push(Block::Evidence(evidence_block(first)));
            }
        }
    }

    blocks
}

fn field_value(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => "N/A".to_string(),
    }
}

/// At most the first citation is rendered: URLs become links, everything
/// else a quoted excerpt.
fn evidence_block(citation: &str) -> Evidence {
    let trimmed = citation.trim();
    if trimmed.starts_with("http") || trimmed.starts_with("www") {
        let cleaned = trimmed
            .replace(['"', '\u{201C}', '\u{201D}'], "")
            .trim()
            .trim_end_matches(['/', '.'])
            .to_string();
        Evidence::Link(cleaned)
    } else {
        Evidence::Quote(trimmed.to_string())
    }
}

/// Render the persona as a paginated plain-text document. Pages are
/// separated by a form feed.
pub fn render_document(persona: &Persona, layout: &PageLayout) -> String {
    let blocks = persona_blocks(persona);
    let pages = paginate(&blocks, layout, &persona.username);

    info!(
        username = %persona.username,
        pages = pages.len(),
        "Report rendered"
    );

    let mut document = pages
        .iter()
        .map(|page| page.lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\u{000C}\n");
    document.push('\n');
    document
}
