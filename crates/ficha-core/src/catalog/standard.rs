//! The reference tables shipped with the tracker.
//!
//! These produce the same [`Catalog`] a JSON catalog file with the default
//! tables would, without requiring one on disk.

use crate::character::Attribute;

use super::{
    AttributeModifier, Catalog, LineageDefinition, LineageEffect, SkillDelta, SkillLists,
    TraitDefinition,
};

impl Catalog {
    /// The default skill lists and definition tables.
    pub fn standard() -> Self {
        Self {
            skills: skill_lists(),
            lineages: lineages(),
            peculiarities: peculiarities(),
            trejeitos: trejeitos(),
            advantages: advantages(),
            disadvantages: disadvantages(),
        }
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn skill_lists() -> SkillLists {
    SkillLists {
        combat: names(&[
            "Briga",
            "Armas Brancas",
            "Armas de Fogo",
            "Arquearia",
            "Arremesso",
            "Esquiva",
            "Bloqueio",
            "Tática",
        ]),
        social: names(&[
            "Persuasão",
            "Intimidação",
            "Enganação",
            "Empatia",
            "Liderança",
            "Etiqueta",
        ]),
        utility: names(&[
            "Atletismo",
            "Furtividade",
            "Investigação",
            "Medicina",
            "Sobrevivência",
            "Prestidigitação",
        ]),
        complementary: names(&[
            "Rastreamento",
            "Computação",
            "Culinária",
            "Navegação",
            "Mitologia",
        ]),
    }
}

fn grant(skill: &str, bonus: i32) -> LineageEffect {
    LineageEffect {
        skill: skill.to_string(),
        bonus,
        requires_choice: false,
    }
}

fn grant_choice(skill: &str, bonus: i32) -> LineageEffect {
    LineageEffect {
        skill: skill.to_string(),
        bonus,
        requires_choice: true,
    }
}

fn lineages() -> Vec<LineageDefinition> {
    let lineage = |name: &str, effects: Vec<LineageEffect>| LineageDefinition {
        name: name.to_string(),
        effects,
    };
    vec![
        lineage("Zeus", vec![grant("Liderança", 2), grant("Intimidação", 1)]),
        lineage(
            "Poseidon",
            vec![grant("Esportes", 1), grant_choice("Condução", 2)],
        ),
        lineage(
            "Atena",
            vec![grant("Tática", 2), grant_choice("Conhecimento", 2)],
        ),
        lineage(
            "Hermes",
            vec![grant_choice("Condução", 2), grant("Furtividade", 1)],
        ),
        lineage("Apolo", vec![grant_choice("Artes", 2), grant("Medicina", 1)]),
        lineage("Hefesto", vec![grant("Ofícios", 2)]),
        lineage("Afrodite", vec![grant("Persuasão", 2), grant("Empatia", 1)]),
        lineage("Ares", vec![grant("Armas Brancas", 2), grant("Briga", 1)]),
        lineage("Ártemis", vec![grant("Arquearia", 2), grant("Rastreamento", 1)]),
    ]
}

fn delta(skill: &str, value: i32) -> SkillDelta {
    SkillDelta {
        skill: skill.to_string(),
        value,
    }
}

fn trait_def(name: &str, deltas: Vec<SkillDelta>) -> TraitDefinition {
    TraitDefinition {
        name: name.to_string(),
        deltas,
    }
}

fn peculiarities() -> Vec<TraitDefinition> {
    vec![
        trait_def("Poliglota", vec![delta("Idiomas", 1)]),
        trait_def("Atleta Nato", vec![delta("Atletismo", 1), delta("Esportes", 1)]),
        trait_def("Mãos de Fada", vec![delta("Ofícios", 1), delta("Prestidigitação", 1)]),
        trait_def("Carismático", vec![delta("Persuasão", 1), delta("Liderança", 1)]),
        trait_def("Olhar Clínico", vec![delta("Investigação", 1), delta("Medicina", 1)]),
        trait_def("Rato de Biblioteca", vec![delta("Conhecimento", 1)]),
    ]
}

fn trejeitos() -> Vec<TraitDefinition> {
    vec![
        trait_def("Desastrado", vec![delta("Furtividade", -1), delta("Ofícios", -1)]),
        trait_def("Gago", vec![delta("Persuasão", -1), delta("Enganação", -1)]),
        trait_def("Medo de Altura", vec![delta("Atletismo", -1)]),
        trait_def("Distraído", vec![delta("Investigação", -1)]),
        trait_def("Sotaque Carregado", vec![delta("Idiomas", -1)]),
    ]
}

fn modifier(name: &str, attribute: Attribute, delta: i32) -> AttributeModifier {
    AttributeModifier {
        name: name.to_string(),
        attribute,
        delta,
    }
}

fn advantages() -> Vec<AttributeModifier> {
    vec![
        modifier("Reflexos Rápidos", Attribute::Agility, 1),
        modifier("Sentidos Aguçados", Attribute::Perception, 1),
        modifier("Força Bruta", Attribute::Strength, 1),
        modifier("Mente Afiada", Attribute::Intellect, 1),
        modifier("Presença Marcante", Attribute::Charisma, 1),
        modifier("Determinação", Attribute::Willpower, 1),
    ]
}

fn disadvantages() -> Vec<AttributeModifier> {
    vec![
        modifier("Míope", Attribute::Perception, -1),
        modifier("Frágil", Attribute::Vigor, -1),
        modifier("Lento", Attribute::Agility, -1),
        modifier("Tímido", Attribute::Charisma, -1),
        modifier("Ingênuo", Attribute::Wisdom, -1),
    ]
}
