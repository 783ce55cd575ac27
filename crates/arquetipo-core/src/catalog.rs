//! Question catalog: the fixed, ordered set of question blocks.
//!
//! Every option carries exactly one [`Archetype`] tag. The catalog is
//! read-only after construction; `Default` builds the 20-block
//! production questionnaire.

use serde::{Deserialize, Serialize};

/// One of the four behavioral archetypes.
///
/// Declaration order matters twice: it is the fixed priority order for
/// the final predominant tie-break, and the scan order when pinning
/// rounding remainders onto the highest percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Warrior,
    King,
    Lover,
    Mage,
}

impl Archetype {
    /// All archetypes in declaration (priority) order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Warrior,
        Archetype::King,
        Archetype::Lover,
        Archetype::Mage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Warrior => "warrior",
            Archetype::King => "king",
            Archetype::Lover => "lover",
            Archetype::Mage => "mage",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warrior" => Ok(Archetype::Warrior),
            "king" => Ok(Archetype::King),
            "lover" => Ok(Archetype::Lover),
            "mage" => Ok(Archetype::Mage),
            other => Err(format!("unknown archetype: {other}")),
        }
    }
}

/// A labeled choice within a question block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Unique within its block (e.g. "7c").
    pub id: String,
    /// Display text.
    pub text: String,
    /// The archetype this option scores toward.
    pub archetype: Archetype,
}

/// An ordered block of options the respondent chooses among.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBlock {
    /// 1-based, unique, ordered.
    pub id: u32,
    pub options: Vec<QuestionOption>,
}

impl QuestionBlock {
    /// Look up an option by id within this block.
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// The ordered, immutable collection of question blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCatalog {
    blocks: Vec<QuestionBlock>,
}

impl QuestionCatalog {
    /// Build a catalog from an ordered block list.
    pub fn new(blocks: Vec<QuestionBlock>) -> Self {
        Self { blocks }
    }

    /// Look up a block by id. Returns `None` for unknown ids; callers
    /// treat a missing block as nothing to render.
    pub fn block(&self, block_id: u32) -> Option<&QuestionBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// All block ids in catalog order.
    pub fn block_ids(&self) -> Vec<u32> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    pub fn blocks(&self) -> &[QuestionBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::new(production_blocks())
    }
}

fn opt(id: &str, text: &str, archetype: Archetype) -> QuestionOption {
    QuestionOption {
        id: id.to_string(),
        text: text.to_string(),
        archetype,
    }
}

/// The 20-block production questionnaire.
fn production_blocks() -> Vec<QuestionBlock> {
    use Archetype::{King, Lover, Mage, Warrior};
    vec![
        QuestionBlock {
            id: 1,
            options: vec![
                opt("1a", "Assertivo e direto nas comunicações", Warrior),
                opt("1b", "Visionário e inspirador em liderança", King),
                opt("1c", "Empático e colaborativo", Lover),
                opt("1d", "Analítico e preciso", Mage),
            ],
        },
        QuestionBlock {
            id: 2,
            options: vec![
                opt("2a", "Foco em resultados imediatos", Warrior),
                opt("2b", "Pensamento estratégico a longo prazo", King),
                opt("2c", "Prioriza relacionamentos interpessoais", Lover),
                opt("2d", "Busca por dados e evidências", Mage),
            ],
        },
        QuestionBlock {
            id: 3,
            options: vec![
                opt("3a", "Toma decisões rapidamente", Warrior),
                opt("3b", "Considera impacto organizacional", King),
                opt("3c", "Consulta equipe antes de decidir", Lover),
                opt("3d", "Analisa todas as variáveis possíveis", Mage),
            ],
        },
        QuestionBlock {
            id: 4,
            options: vec![
                opt("4a", "Enfrenta desafios de forma direta", Warrior),
                opt("4b", "Delega responsabilidades estratégicas", King),
                opt("4c", "Busca consenso em conflitos", Lover),
                opt("4d", "Pesquisa soluções detalhadas", Mage),
            ],
        },
        QuestionBlock {
            id: 5,
            options: vec![
                opt("5a", "Comunicação objetiva e clara", Warrior),
                opt("5b", "Discurso inspirador e motivador", King),
                opt("5c", "Escuta ativa e empática", Lover),
                opt("5d", "Apresenta dados e fatos", Mage),
            ],
        },
        QuestionBlock {
            id: 6,
            options: vec![
                opt("6a", "Trabalha melhor sob pressão", Warrior),
                opt("6b", "Mantém visão ampla mesmo sob stress", King),
                opt("6c", "Prioriza bem-estar da equipe", Lover),
                opt("6d", "Prefere planejamento detalhado", Mage),
            ],
        },
        QuestionBlock {
            id: 7,
            options: vec![
                opt("7a", "Gosta de competição e desafios", Warrior),
                opt("7b", "Foca em crescimento organizacional", King),
                opt("7c", "Valoriza harmonia no ambiente", Lover),
                opt("7d", "Busca excelência técnica", Mage),
            ],
        },
        QuestionBlock {
            id: 8,
            options: vec![
                opt("8a", "Prefere trabalhar independentemente", Warrior),
                opt("8b", "Assume naturalmente papel de líder", King),
                opt("8c", "Trabalha melhor em equipe", Lover),
                opt("8d", "Prefere projetos individuais complexos", Mage),
            ],
        },
        QuestionBlock {
            id: 9,
            options: vec![
                opt("9a", "Orientado por metas e objetivos", Warrior),
                opt("9b", "Focado na visão organizacional", King),
                opt("9c", "Motivado por propósito e valores", Lover),
                opt("9d", "Impulsionado por conhecimento", Mage),
            ],
        },
        QuestionBlock {
            id: 10,
            options: vec![
                opt("10a", "Ritmo acelerado de trabalho", Warrior),
                opt("10b", "Ritmo estratégico e planejado", King),
                opt("10c", "Ritmo considerando a equipe", Lover),
                opt("10d", "Ritmo metódico e cuidadoso", Mage),
            ],
        },
        QuestionBlock {
            id: 11,
            options: vec![
                opt("11a", "Confiante em suas habilidades", Warrior),
                opt("11b", "Confiante em sua visão de futuro", King),
                opt("11c", "Confiante nas pessoas", Lover),
                opt("11d", "Confiante em sua expertise", Mage),
            ],
        },
        QuestionBlock {
            id: 12,
            options: vec![
                opt("12a", "Feedback direto e honesto", Warrior),
                opt("12b", "Feedback focado no desenvolvimento", King),
                opt("12c", "Feedback encorajador e construtivo", Lover),
                opt("12d", "Feedback específico e detalhado", Mage),
            ],
        },
        QuestionBlock {
            id: 13,
            options: vec![
                opt("13a", "Adapta-se rapidamente a mudanças", Warrior),
                opt("13b", "Lidera processos de transformação", King),
                opt("13c", "Ajuda outros a se adaptarem", Lover),
                opt("13d", "Analisa impactos das mudanças", Mage),
            ],
        },
        QuestionBlock {
            id: 14,
            options: vec![
                opt("14a", "Foco na execução eficiente", Warrior),
                opt("14b", "Foco na direção estratégica", King),
                opt("14c", "Foco no desenvolvimento de pessoas", Lover),
                opt("14d", "Foco na qualidade e precisão", Mage),
            ],
        },
        QuestionBlock {
            id: 15,
            options: vec![
                opt("15a", "Resolve problemas de forma prática", Warrior),
                opt("15b", "Vê oportunidades em problemas", King),
                opt("15c", "Considera impacto humano dos problemas", Lover),
                opt("15d", "Investiga causas raiz dos problemas", Mage),
            ],
        },
        QuestionBlock {
            id: 16,
            options: vec![
                opt("16a", "Demonstra energia e determinação", Warrior),
                opt("16b", "Demonstra autoridade natural", King),
                opt("16c", "Demonstra cuidado genuíno", Lover),
                opt("16d", "Demonstra competência técnica", Mage),
            ],
        },
        QuestionBlock {
            id: 17,
            options: vec![
                opt("17a", "Valoriza eficiência e produtividade", Warrior),
                opt("17b", "Valoriza inovação e crescimento", King),
                opt("17c", "Valoriza relacionamentos e colaboração", Lover),
                opt("17d", "Valoriza precisão e qualidade", Mage),
            ],
        },
        QuestionBlock {
            id: 18,
            options: vec![
                opt("18a", "Estilo direto de negociação", Warrior),
                opt("18b", "Negocia pensando no longo prazo", King),
                opt("18c", "Busca soluções win-win", Lover),
                opt("18d", "Prepara-se com dados detalhados", Mage),
            ],
        },
        QuestionBlock {
            id: 19,
            options: vec![
                opt("19a", "Motivado por conquistas pessoais", Warrior),
                opt("19b", "Motivado por legado e impacto", King),
                opt("19c", "Motivado por conexões humanas", Lover),
                opt("19d", "Motivado por conhecimento e expertise", Mage),
            ],
        },
        QuestionBlock {
            id: 20,
            options: vec![
                opt("20a", "Celebra vitórias e superações", Warrior),
                opt("20b", "Celebra marcos estratégicos", King),
                opt("20c", "Celebra conquistas da equipe", Lover),
                opt("20d", "Celebra aprendizados e descobertas", Mage),
            ],
        },
    ]
}
