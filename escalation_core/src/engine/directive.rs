//! Directive composition.

use content_rules::{Archetype, ClimaxRule, EvolutionStage, Threshold, ToneAxis, ToneLevelCatalog};

/// Everything a directive depends on. Composition is a pure function of
/// these values.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveInputs<'a> {
    pub archetype: &'a Archetype,
    pub tones: &'a ToneLevelCatalog,
    pub climax: Option<&'a ClimaxRule>,
    pub escalation: Threshold,
    pub sex_level: Threshold,
    pub violence_level: Threshold,
}

/// Compose the bracketed directive for one turn.
///
/// Layout: `[core_prompt stage climax? sex_tone violence_tone]`, with empty
/// fragments dropped and whitespace collapsed. Returns an empty string when
/// every fragment is empty.
pub fn compose_directive(inputs: &DirectiveInputs<'_>) -> String {
    let empty_stage = EvolutionStage::default();
    let stage = inputs
        .archetype
        .stage_at(inputs.escalation)
        .unwrap_or(&empty_stage);

    let climax = inputs
        .climax
        .filter(|rule| rule.applies(inputs.escalation))
        .map(|rule| rule.fragment.as_str());

    let sex = tone_text(inputs.tones, stage, ToneAxis::Sex, inputs.sex_level);
    let violence = tone_text(inputs.tones, stage, ToneAxis::Violence, inputs.violence_level);

    let body = join_fragments([
        Some(inputs.archetype.core_prompt.as_str()),
        Some(stage.description.as_str()),
        climax,
        Some(sex.as_str()),
        Some(violence.as_str()),
    ]);

    if body.is_empty() {
        body
    } else {
        format!("[{body}]")
    }
}

/// Tone text for one axis: the global text for `level`, followed by the
/// stage's override for `level` when it has one.
pub fn tone_text(
    tones: &ToneLevelCatalog,
    stage: &EvolutionStage,
    axis: ToneAxis,
    level: Threshold,
) -> String {
    join_fragments([tones.text(axis, level), stage.override_for(axis, level)])
}

fn join_fragments<'a>(fragments: impl IntoIterator<Item = Option<&'a str>>) -> String {
    fragments
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
