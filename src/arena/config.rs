use std::{fmt, str::FromStr};

use crate::core::WildExchange;

use super::{
    agent::{ActionPrompter, Agent, HumanAgent, TheoryOfMindAgent, ZeroOrderAgent},
    belief::MAX_TOM_ORDER,
    errors::ConfigurationError,
    scoring::ScoringRule,
};

/// Which kind of player sits in a seat.
///
/// The string forms are `human`, `zero_order` and `tom_<k>`. `tom_0` is
/// the same thing as `zero_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum AgentKind {
    Human,
    ZeroOrder,
    TheoryOfMind(usize),
}

impl AgentKind {
    /// The recursion depth this kind of agent reasons with.
    pub fn order(&self) -> Option<usize> {
        match self {
            AgentKind::Human => None,
            AgentKind::ZeroOrder => Some(0),
            AgentKind::TheoryOfMind(k) => Some(*k),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            AgentKind::TheoryOfMind(order) if *order > MAX_TOM_ORDER => {
                Err(ConfigurationError::TheoryOfMindOrderTooHigh {
                    order: *order,
                    max: MAX_TOM_ORDER,
                })
            }
            _ => Ok(()),
        }
    }

    /// Build the agent for `seat_idx`. Human seats need a prompter.
    pub fn build(
        &self,
        seat_idx: usize,
        config: &SessionConfig,
        prompter: Option<Box<dyn ActionPrompter>>,
    ) -> Result<Box<dyn Agent>, ConfigurationError> {
        self.validate()?;
        let threshold = config.confidence_threshold;
        let agent: Box<dyn Agent> = match self {
            AgentKind::Human => {
                let prompter = prompter.ok_or(ConfigurationError::MissingPrompter(seat_idx))?;
                Box::new(
                    HumanAgent::new(prompter)
                        .with_max_invalid_retries(config.illegal_action_policy.max_retries()),
                )
            }
            AgentKind::ZeroOrder | AgentKind::TheoryOfMind(0) => {
                Box::new(ZeroOrderAgent::new(threshold, config.seed_for(seat_idx)))
            }
            AgentKind::TheoryOfMind(order) => Box::new(TheoryOfMindAgent::new(
                *order,
                threshold,
                config.seed_for(seat_idx),
            )),
        };
        Ok(agent)
    }
}

impl FromStr for AgentKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "human" => Ok(AgentKind::Human),
            "zero_order" => Ok(AgentKind::ZeroOrder),
            other => {
                let order = other
                    .strip_prefix("tom_")
                    .and_then(|k| k.parse::<usize>().ok())
                    .ok_or_else(|| ConfigurationError::UnsupportedAgentKind(s.to_string()))?;
                if order == 0 {
                    Ok(AgentKind::ZeroOrder)
                } else {
                    Ok(AgentKind::TheoryOfMind(order))
                }
            }
        }
    }
}

impl TryFrom<String> for AgentKind {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AgentKind> for String {
    fn from(kind: AgentKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Human => write!(f, "human"),
            AgentKind::ZeroOrder => write!(f, "zero_order"),
            AgentKind::TheoryOfMind(k) => write!(f, "tom_{k}"),
        }
    }
}

/// What happens when an agent does something that isn't allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IllegalActionPolicy {
    /// Ask the same agent again, up to `max_retries` more times. After that
    /// the agent forfeits the round just like `Penalize`.
    Retry { max_retries: u32 },
    /// The agent loses `illegal_action_penalty` points and the round ends
    /// without a resolution.
    Penalize,
}

impl Default for IllegalActionPolicy {
    fn default() -> Self {
        IllegalActionPolicy::Retry { max_retries: 3 }
    }
}

impl IllegalActionPolicy {
    /// How many times an agent can be asked again after an illegal action.
    pub fn max_retries(&self) -> u32 {
        match self {
            IllegalActionPolicy::Retry { max_retries } => *max_retries,
            IllegalActionPolicy::Penalize => 0,
        }
    }
}

/// Everything needed to set up a session.
///
/// # Examples
///
/// ```
/// use wild_perudo::arena::config::{AgentKind, SessionConfig};
///
/// let config = SessionConfig::new(
///     vec![AgentKind::ZeroOrder, AgentKind::TheoryOfMind(2)],
///     10,
/// );
/// assert!(config.validate().is_ok());
/// assert_eq!(5, config.hand_size);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// One entry per seat, in turn order.
    pub agents: Vec<AgentKind>,
    pub max_rounds: usize,
    /// Dice per player. Never changes during a session.
    pub hand_size: usize,
    pub wild_exchange: WildExchange,
    pub scoring: ScoringRule,
    pub illegal_action_policy: IllegalActionPolicy,
    /// Points an agent loses when it forfeits a round.
    pub illegal_action_penalty: i64,
    /// Automatic agents challenge bids less likely than this to hold.
    pub confidence_threshold: f64,
    /// Seed for the dice and every automatic agent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agents: vec![],
            max_rounds: 10,
            hand_size: 5,
            wild_exchange: WildExchange::default(),
            scoring: ScoringRule::default(),
            illegal_action_policy: IllegalActionPolicy::default(),
            illegal_action_penalty: 1,
            confidence_threshold: 0.5,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(agents: Vec<AgentKind>, max_rounds: usize) -> Self {
        Self {
            agents,
            max_rounds,
            ..Default::default()
        }
    }

    /// Check everything. Nothing is rolled until this passes.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.agents.len() < 2 {
            return Err(ConfigurationError::TooFewPlayers(self.agents.len()));
        }
        if self.max_rounds == 0 {
            return Err(ConfigurationError::NonPositiveMaxRounds);
        }
        if self.hand_size == 0 {
            return Err(ConfigurationError::NonPositiveHandSize);
        }
        for kind in &self.agents {
            kind.validate()?;
        }
        // Open at zero so that agents still challenge.
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(ConfigurationError::InvalidConfidenceThreshold(
                self.confidence_threshold,
            ));
        }
        if !self.scoring.is_valid() || self.illegal_action_penalty < 0 {
            return Err(ConfigurationError::NegativeScoring);
        }
        Ok(())
    }

    /// Seats that need a prompter.
    pub fn human_seats(&self) -> Vec<usize> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == AgentKind::Human)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The seed for the agent in `seat_idx`. Random when there's no
    /// session seed.
    pub fn seed_for(&self, seat_idx: usize) -> u64 {
        self.seed
            .map_or_else(rand::random, |s| s.wrapping_add(1 + seat_idx as u64))
    }

    /// Parse and validate a JSON config.
    ///
    /// An agent string that names no known kind is reported as
    /// `UnsupportedAgentKind`. Any other malformed input is
    /// `InvalidConfiguration`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let invalid = |e: serde_json::Error| ConfigurationError::InvalidConfiguration(e.to_string());
        let value: serde_json::Value = serde_json::from_str(json).map_err(invalid)?;
        if let Some(agents) = value.get("agents").and_then(|a| a.as_array()) {
            for name in agents.iter().filter_map(|a| a.as_str()) {
                name.parse::<AgentKind>()?;
            }
        }
        let config: SessionConfig = serde_json::from_value(value).map_err(invalid)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigurationError::InvalidConfiguration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_kinds() {
        assert_eq!(Ok(AgentKind::Human), "human".parse());
        assert_eq!(Ok(AgentKind::ZeroOrder), "zero_order".parse());
        assert_eq!(Ok(AgentKind::ZeroOrder), "tom_0".parse());
        assert_eq!(Ok(AgentKind::TheoryOfMind(3)), "TOM_3".parse());
        assert_eq!(
            Err(ConfigurationError::UnsupportedAgentKind("random".to_string())),
            "random".parse::<AgentKind>()
        );
        assert!("tom_".parse::<AgentKind>().is_err());
        assert!("tom_x".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [
            AgentKind::Human,
            AgentKind::ZeroOrder,
            AgentKind::TheoryOfMind(2),
        ] {
            assert_eq!(Ok(kind), kind.to_string().parse());
        }
    }

    #[test]
    fn test_validate() {
        let ok = SessionConfig::new(vec![AgentKind::ZeroOrder; 3], 5);
        assert_eq!(Ok(()), ok.validate());

        let one = SessionConfig::new(vec![AgentKind::ZeroOrder], 5);
        assert_eq!(Err(ConfigurationError::TooFewPlayers(1)), one.validate());

        let no_rounds = SessionConfig::new(vec![AgentKind::ZeroOrder; 2], 0);
        assert_eq!(Err(ConfigurationError::NonPositiveMaxRounds), no_rounds.validate());

        let no_dice = SessionConfig {
            hand_size: 0,
            ..ok.clone()
        };
        assert_eq!(Err(ConfigurationError::NonPositiveHandSize), no_dice.validate());

        let too_deep = SessionConfig::new(
            vec![AgentKind::ZeroOrder, AgentKind::TheoryOfMind(MAX_TOM_ORDER + 1)],
            5,
        );
        assert_eq!(
            Err(ConfigurationError::TheoryOfMindOrderTooHigh {
                order: MAX_TOM_ORDER + 1,
                max: MAX_TOM_ORDER
            }),
            too_deep.validate()
        );

        let bad_threshold = SessionConfig {
            confidence_threshold: 1.5,
            ..ok.clone()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigurationError::InvalidConfidenceThreshold(_))
        ));

        let zero_threshold = SessionConfig {
            confidence_threshold: 0.0,
            ..ok.clone()
        };
        assert_eq!(
            Err(ConfigurationError::InvalidConfidenceThreshold(0.0)),
            zero_threshold.validate()
        );

        let certain = SessionConfig {
            confidence_threshold: 1.0,
            ..ok.clone()
        };
        assert_eq!(Ok(()), certain.validate());

        let nan_threshold = SessionConfig {
            confidence_threshold: f64::NAN,
            ..ok.clone()
        };
        assert!(nan_threshold.validate().is_err());

        let negative = SessionConfig {
            illegal_action_penalty: -1,
            ..ok
        };
        assert_eq!(Err(ConfigurationError::NegativeScoring), negative.validate());
    }

    #[test]
    fn test_human_needs_prompter() {
        let config = SessionConfig::new(vec![AgentKind::ZeroOrder, AgentKind::Human], 5);
        assert_eq!(vec![1], config.human_seats());
        assert!(matches!(
            AgentKind::Human.build(1, &config, None),
            Err(ConfigurationError::MissingPrompter(1))
        ));
        assert!(AgentKind::ZeroOrder.build(0, &config, None).is_ok());
    }

    #[test]
    fn test_seeded_agents_are_reproducible() {
        let config = SessionConfig {
            seed: Some(10),
            ..SessionConfig::new(vec![AgentKind::ZeroOrder; 2], 5)
        };
        assert_eq!(config.seed_for(1), config.seed_for(1));
        assert_ne!(config.seed_for(0), config.seed_for(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_config() {
        let config = SessionConfig::from_json(
            r#"{
                "agents": ["zero_order", "tom_2", "human"],
                "max_rounds": 3,
                "wild_exchange": "double",
                "illegal_action_policy": "penalize"
            }"#,
        )
        .unwrap();
        assert_eq!(
            vec![
                AgentKind::ZeroOrder,
                AgentKind::TheoryOfMind(2),
                AgentKind::Human
            ],
            config.agents
        );
        assert_eq!(WildExchange::Double, config.wild_exchange);
        assert_eq!(IllegalActionPolicy::Penalize, config.illegal_action_policy);
        assert_eq!(5, config.hand_size);

        let again = SessionConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, again);

        assert!(matches!(
            SessionConfig::from_json(r#"{"agents": ["zero_order"], "max_rounds": "x"}"#),
            Err(ConfigurationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SessionConfig::from_json("not json"),
            Err(ConfigurationError::InvalidConfiguration(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_unknown_agent_kind() {
        assert_eq!(
            Err(ConfigurationError::UnsupportedAgentKind("robot".to_string())),
            SessionConfig::from_json(r#"{"agents": ["robot", "human"]}"#)
        );
        assert_eq!(
            Err(ConfigurationError::UnsupportedAgentKind("wizard".to_string())),
            SessionConfig::from_json(r#"{"agents": ["zero_order", "wizard"], "max_rounds": 2}"#)
        );
    }
}
