//! Prompt text sent to the model drivers.
//!
//! The refine and script prompts are fixed instructions. The animation code
//! prompt is assembled from the capability tables in
//! [`melies_core::capability`], so the elements the model is told to use and
//! the constructs the sanitizer strips come from the same source.

use melies_core::capability::{
    ALLOWED_COLORS, ALLOWED_METHODS, ANIMATION_ELEMENTS, FORBIDDEN_ELEMENTS, SCENE_CLASS,
    SHAPE_ELEMENTS,
};

/// System prompt for the prompt refinement stage.
pub const REFINE_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer specializing in educational video content creation. Your task is to refine and enhance user prompts to create comprehensive, detailed prompts that will be used to generate high-quality educational video scripts.

When refining a prompt, you should:
1. Expand on the topic to make it more comprehensive
2. Add specific details about what should be covered
3. Suggest visual elements that would enhance understanding
4. Ensure the prompt is clear and actionable for script generation
5. Maintain the original intent while making it more detailed

Return only the refined prompt without any additional commentary or explanation do this in under 250 words."#;

/// System prompt for the script generation stage.
///
/// The embedded example pins the scene/speech format the later stages parse
/// their cues from.
pub const SCRIPT_SYSTEM_PROMPT: &str = r#"You are an AI video scriptwriter. Your task is to take a detailed user prompt and write a full production script (visuals and speech) for a video that is UNDER 2 MINUTES.
You MUST follow the format of the examples below exactly.

--- EXAMPLE START ---
User prompt = "Develop a comprehensive video script explaining the Binomial Theorem. Begin by defining the theorem and its purpose. Detail Pascal's Triangle and its relationship to the coefficients. Provide a step-by-step breakdown for n=2 and n=3. Include the binomial coefficient formula."

--scene1--
Title: What is the Binomial Theorem?
Visuals = "Clean animation of (x+y)^n appearing on screen. The 'n' clicks from 2, to 3, to 10. The expansion for n=10 becomes huge and complex."
--speech--
0:05 Hello and welcome! Today we're exploring a powerful tool in algebra: the Binomial Theorem.
0:10 Ever wondered how to expand an expression like (x + y) to the power of 10 without doing endless multiplication?
0:17 That's exactly what this theorem is for. It gives us a fast, elegant formula for this exact problem.

--scene2--
Title: The Formula & Pascal's Triangle
Visuals = "The binomial coefficient formula (n choose k) appears. Next to it, an animated Pascal's Triangle builds itself, row by row. Highlight n=3 row [1, 3, 3, 1]."
--speech--
0:25 The theorem uses something called 'binomial coefficients', which you might know from Pascal's Triangle.
0:32 For example, to expand (x+y) to the power of 3, we look at the row [1, 3, 3, 1].
0:40 These numbers are the 'coefficients', or multipliers, for each term in our expanded expression.
--- EXAMPLE END ---

You will now be given a new user prompt. Generate the script in the exact same format. DO NOT add any extra commentary and give manim compatible visuals.

The script must be clear, easy to follow, and strictly under 2 minutes."#;

/// Tone instruction prefixed to the script before speech synthesis.
pub const NARRATION_TONE_PREFIX: &str =
    "Read the following script in a clear, informative, and friendly tone: ";

/// User message for the refine stage, priming the model to continue with the
/// refined text and nothing else.
pub fn refine_user_prompt(raw_prompt: &str) -> String {
    format!("User Prompt: {raw_prompt}\n\nRefined Prompt:")
}

/// Text handed to the speech driver for a script.
pub fn narration_prompt(script: &str) -> String {
    format!("{NARRATION_TONE_PREFIX}{script}")
}

/// User message for the code generation stage.
///
/// Sent without a system prompt; the rules and the script travel in one
/// message. The whitelist and blacklist sections are rendered from the
/// capability tables.
pub fn animation_code_prompt(script: &str) -> String {
    let shapes = ticked_calls(SHAPE_ELEMENTS);
    let animations = ticked_calls(ANIMATION_ELEMENTS);
    let colors = ticked_names(&base_colors());
    let (getters, positioning): (Vec<&str>, Vec<&str>) = ALLOWED_METHODS
        .iter()
        .copied()
        .partition(|method| method.starts_with("get_"));
    let positioning = ticked_methods(&positioning);
    let getters = ticked_methods(&getters);
    let forbidden = ticked_names(FORBIDDEN_ELEMENTS);

    format!(
        r#"You are an expert Manim developer. Your task is to write a *complete, single* Python script that generates an animation based on the user's script.

CRITICAL RULES - BREAKING THESE WILL CAUSE RENDERING FAILURE:

1.  The script MUST import all necessary Manim components (e.g., `from manim import *`).
2.  The script MUST define a single scene class named `{SCENE_CLASS}`.
3.  The class MUST have a `construct(self)` method.
4.  All animations must happen inside `construct(self)`.
5.  Use `self.play(...)` for animations and `self.wait(...)` for pauses.

6.  WHITELIST - Use ONLY these approved elements:
  - **Text**: `Text(...)` for ALL text, titles, labels, formulas (use Unicode: ∫, Σ, ≤, ≥, θ, π, √, ×, ÷)
  - **Shapes**: {shapes} ONLY
  - **Colors**: {colors} (and their variants like BLUE_A, RED_B, etc.)
  - **Animations**: {animations}
  - **Positioning**: {positioning}
  - **Get methods**: {getters}

7.  BLACKLIST - NEVER use these (they are stripped before rendering):
  - ❌ Banned constructs: {forbidden}
  - ❌ Dict unpacking: `**config`, `**kwargs`
  - ❌ Hallucinated methods: `wait_until()`, `pause()`

8.  Do NOT add any comments or explanations outside the Python code. Only return raw Python.
9.  Base your animation on the "Visuals" and "Speech" cues. Use creative combinations of approved elements only.

Here is the user's script. Create a Manim scene that visualizes it using ONLY whitelisted elements:
---
{script}
"#
    )
}

/// Colors without a shade suffix; variants are covered by a note in the
/// prompt rather than spelled out.
fn base_colors() -> Vec<&'static str> {
    ALLOWED_COLORS
        .iter()
        .copied()
        .filter(|color| !color.contains('_'))
        .collect()
}

fn ticked_calls(names: &[&str]) -> String {
    let ticked: Vec<String> = names.iter().map(|name| format!("`{name}()`")).collect();
    ticked.join(", ")
}

fn ticked_methods(names: &[&str]) -> String {
    let ticked: Vec<String> = names.iter().map(|name| format!("`.{name}()`")).collect();
    ticked.join(", ")
}

fn ticked_names(names: &[&str]) -> String {
    let ticked: Vec<String> = names.iter().map(|name| format!("`{name}`")).collect();
    ticked.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refine_user_prompt_primes_for_continuation() {
        let prompt = refine_user_prompt("explain entropy");
        assert!(prompt.starts_with("User Prompt: explain entropy"));
        assert!(prompt.ends_with("Refined Prompt:"));
    }

    #[test]
    fn refine_system_prompt_bounds_length() {
        assert!(REFINE_SYSTEM_PROMPT.contains("under 250 words"));
    }

    #[test]
    fn script_system_prompt_pins_the_scene_format() {
        assert!(SCRIPT_SYSTEM_PROMPT.contains("--scene1--"));
        assert!(SCRIPT_SYSTEM_PROMPT.contains("--speech--"));
        assert!(SCRIPT_SYSTEM_PROMPT.contains("UNDER 2 MINUTES"));
    }

    #[test]
    fn narration_prompt_prefixes_the_tone_instruction() {
        let prompt = narration_prompt("0:05 Hello and welcome!");
        assert!(prompt.starts_with(NARRATION_TONE_PREFIX));
        assert!(prompt.ends_with("0:05 Hello and welcome!"));
    }

    #[test]
    fn code_prompt_embeds_the_script_after_a_separator() {
        let prompt = animation_code_prompt("--scene1--\nTitle: Entropy");
        let separator = prompt.find("---\n").expect("separator present");
        assert!(prompt[separator..].contains("Title: Entropy"));
    }

    #[test]
    fn code_prompt_names_the_required_scene_class() {
        let prompt = animation_code_prompt("s");
        assert!(prompt.contains("`ManimScene`"));
        assert!(prompt.contains("construct(self)"));
    }

    #[test]
    fn code_prompt_covers_every_whitelisted_element() {
        let prompt = animation_code_prompt("s");
        for shape in SHAPE_ELEMENTS {
            assert!(prompt.contains(&format!("`{shape}()`")), "missing {shape}");
        }
        for animation in ANIMATION_ELEMENTS {
            assert!(
                prompt.contains(&format!("`{animation}()`")),
                "missing {animation}"
            );
        }
        for method in ALLOWED_METHODS {
            assert!(
                prompt.contains(&format!("`.{method}()`")),
                "missing {method}"
            );
        }
    }

    #[test]
    fn code_prompt_bans_every_forbidden_element() {
        let prompt = animation_code_prompt("s");
        for element in FORBIDDEN_ELEMENTS {
            assert!(prompt.contains(&format!("`{element}`")), "missing {element}");
        }
    }
}
