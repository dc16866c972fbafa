// Localized prompt text for the answer and rewrite templates.
// The builder in `prompt/mod.rs` decides which blocks appear and in what order;
// this file only holds wording.

use crate::language::Language;

/// All fixed wording for one language.
pub struct TemplateText {
    pub preamble: &'static str,
    pub rewrite_preamble: &'static str,
    pub instructions_label: &'static str,
    pub options_instruction: &'static str,
    pub fact_instruction: &'static str,
    pub paragraph_instruction: &'static str,
    pub style_instruction: &'static str,
    pub language_instruction: &'static str,
    pub rewrite_instruction: &'static str,
    pub consistency_instruction: &'static str,
    pub rewrite_context_label: &'static str,
    pub previous_answer_label: &'static str,
    pub feedback_label: &'static str,
    pub question_label: &'static str,
    pub options_label: &'static str,
    pub user_data_label: &'static str,
    pub document_label: &'static str,
    pub response_label: &'static str,
    pub not_provided: &'static str,
}

pub const ENGLISH: TemplateText = TemplateText {
    preamble: "You are an expert at generating precise, professional, and compelling answers to grant application questions using the provided **User Information**.",
    rewrite_preamble: "You are an expert at revising answers to grant application questions using the provided **User Information** and the user's feedback.",
    instructions_label: "**Instructions**:",
    options_instruction: "- If **Options** are provided, respond with exactly one of the options, using its literal text with no additional words.",
    fact_instruction: "- If no options are provided and the question asks for a specific fact (such as a name, date, number, or address), respond with only that precise information.",
    paragraph_instruction: "- Otherwise, respond with a single compelling, professional paragraph that directly answers the question.",
    style_instruction: "- Do not use markdown, bullet points, introductory phrases, or commentary.",
    language_instruction: "- Respond in English.",
    rewrite_instruction: "- Rewrite the **Previous Answer** so that it fully addresses the **Feedback**.",
    consistency_instruction: "- Keep every fact consistent with the **User Information**.",
    rewrite_context_label: "**Rewrite Context**:",
    previous_answer_label: "**Previous Answer**:",
    feedback_label: "**Feedback**:",
    question_label: "**Question**:",
    options_label: "**Options**:",
    user_data_label: "**User Information**:",
    document_label: "**Supporting Document**:",
    response_label: "**Response**:",
    not_provided: "Not provided",
};

pub const FRENCH: TemplateText = TemplateText {
    preamble: "Vous êtes un expert dans la génération de réponses précises, professionnelles et convaincantes aux questions des demandes de subventions en utilisant les **Informations Utilisateur** fournies.",
    rewrite_preamble: "Vous êtes un expert dans la révision de réponses aux questions des demandes de subventions en utilisant les **Informations Utilisateur** fournies et les commentaires de l'utilisateur.",
    instructions_label: "**Instructions** :",
    options_instruction: "- Si des **Options** sont fournies, répondez avec exactement une des options, en reprenant son texte littéral sans aucun mot supplémentaire.",
    fact_instruction: "- Si aucune option n'est fournie et que la question porte sur un fait précis (comme un nom, une date, un nombre ou une adresse), répondez uniquement avec cette information précise.",
    paragraph_instruction: "- Sinon, répondez avec un seul paragraphe convaincant et professionnel qui répond directement à la question.",
    style_instruction: "- N'utilisez pas de markdown, de puces, de phrases d'introduction ni de commentaires.",
    language_instruction: "- Répondez en français.",
    rewrite_instruction: "- Réécrivez la **Réponse Précédente** afin qu'elle tienne pleinement compte des **Commentaires**.",
    consistency_instruction: "- Gardez tous les faits cohérents avec les **Informations Utilisateur**.",
    rewrite_context_label: "**Contexte de Réécriture** :",
    previous_answer_label: "**Réponse Précédente** :",
    feedback_label: "**Commentaires** :",
    question_label: "**Question** :",
    options_label: "**Options** :",
    user_data_label: "**Informations Utilisateur** :",
    document_label: "**Document Justificatif** :",
    response_label: "**Réponse** :",
    not_provided: "Non fourni",
};

pub fn template_for(language: Language) -> &'static TemplateText {
    match language {
        Language::English => &ENGLISH,
        Language::French => &FRENCH,
    }
}
