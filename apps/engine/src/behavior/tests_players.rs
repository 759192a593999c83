//! Player behavior tests against canned collaborators.

use std::sync::Arc;
use std::time::Duration;

use super::test_doubles::FixedDecider;
use crate::behavior::agent::{AgentPlayer, VOTE_STRATEGY_KEY};
use crate::behavior::trait_def::{Extras, PlayerBehavior, PlayerContext};
use crate::behavior::workflow::WorkflowPlayer;
use crate::config::GameConfig;
use crate::domain::merge::{apply_delta, MindsetDelta, StateDelta};
use crate::domain::state::{GameState, Phase, Role, Suspicion, Suspicions};
use crate::domain::test_state_helpers::{cast, enter_phase, speech, state_with_players, with_roles};

fn table() -> GameState {
    let mut state = state_with_players(&["a", "b", "c", "d"]);
    with_roles(
        &mut state,
        &[("a", Role::Civilian), ("b", Role::Spy), ("c", Role::Civilian), ("d", Role::Civilian)],
    );
    state
}

fn ctx(state: &GameState, player: &str) -> PlayerContext {
    PlayerContext::new(Arc::new(state.clone()), player, Arc::new(GameConfig::default()))
}

fn suspect(target: &str, confidence: f64) -> MindsetDelta {
    let mut suspicions = Suspicions::new();
    suspicions.insert(target.into(), Suspicion::new(Role::Spy, confidence, "evasive"));
    MindsetDelta {
        self_belief: None,
        suspicions,
    }
}

#[tokio::test]
async fn workflow_speech_appends_with_next_seq() {
    let mut state = table();
    state.completed_speeches.push(speech(1, 0, "a"));
    let decider = FixedDecider::voting_for("c", MindsetDelta::default());
    let player = WorkflowPlayer::new(Arc::new(decider));

    let delta = player.decide_speech(&ctx(&state, "b")).await.unwrap();
    assert_eq!(delta.completed_speeches.len(), 1);
    assert_eq!(delta.completed_speeches[0].seq, 1);
    apply_delta(&mut state, &delta).unwrap();
    assert!(state.has_spoken_this_round("b"));
}

#[tokio::test]
async fn workflow_guards_skip_the_collaborator() {
    let mut state = table();
    state.completed_speeches.push(speech(1, 0, "a"));
    let decider = Arc::new(FixedDecider::voting_for("c", MindsetDelta::default()));
    let player = WorkflowPlayer::new(decider.clone());

    // already spoke
    assert!(player.decide_speech(&ctx(&state, "a")).await.unwrap().is_empty());
    // wrong phase
    assert!(player.decide_vote(&ctx(&state, "a")).await.unwrap().is_empty());
    // eliminated
    state.eliminated_players.push("d".into());
    enter_phase(&mut state, Phase::Voting);
    assert!(player.decide_vote(&ctx(&state, "d")).await.unwrap().is_empty());

    assert_eq!(decider.calls(), 0);
}

#[tokio::test]
async fn workflow_vote_carries_target_and_mindset() {
    let mut state = table();
    enter_phase(&mut state, Phase::Voting);
    let player = WorkflowPlayer::new(Arc::new(FixedDecider::voting_for("b", suspect("b", 0.8))));

    let delta = player.decide_vote(&ctx(&state, "a")).await.unwrap();
    apply_delta(&mut state, &delta).unwrap();
    assert_eq!(state.current_votes["a"].target, "b");
    assert!(state.has_valid_vote("a"));
    assert_eq!(
        state.player_private_states["a"].mindset.suspicions["b"].confidence,
        0.8
    );
}

#[tokio::test]
async fn workflow_replaces_invalid_targets() {
    let mut state = table();
    state.eliminated_players.push("c".into());
    enter_phase(&mut state, Phase::Voting);
    let decider = FixedDecider::voting_for("c", MindsetDelta::default());
    let player = WorkflowPlayer::new(Arc::new(decider));

    let delta = player.decide_vote(&ctx(&state, "a")).await.unwrap();
    assert_eq!(delta.current_votes["a"].target, "b");
}

#[tokio::test]
async fn failures_fall_back_deterministically() {
    let mut state = table();
    let player = WorkflowPlayer::new(Arc::new(FixedDecider::failing()));

    let delta = player.decide_speech(&ctx(&state, "a")).await.unwrap();
    assert_eq!(delta.completed_speeches[0].content, "");
    assert!(delta.player_private_states.is_empty());

    enter_phase(&mut state, Phase::Voting);
    let delta = player.decide_vote(&ctx(&state, "c")).await.unwrap();
    assert_eq!(delta.current_votes["c"].target, "a");
}

#[tokio::test(start_paused = true)]
async fn slow_collaborators_time_out() {
    let mut state = table();
    enter_phase(&mut state, Phase::Voting);
    let mut decider = FixedDecider::voting_for("d", MindsetDelta::default());
    decider.delay = Some(Duration::from_secs(60));
    let player = WorkflowPlayer::new(Arc::new(decider));

    let mut config = GameConfig::default();
    config.behavior.decision_timeout_ms = Some(100);
    let ctx = PlayerContext::new(Arc::new(state.clone()), "a", Arc::new(config));

    let delta = player.decide_vote(&ctx).await.unwrap();
    assert_eq!(delta.current_votes["a"].target, "b");
}

#[tokio::test]
async fn agent_votes_from_updated_mindset() {
    let mut state = table();
    enter_phase(&mut state, Phase::Voting);
    // collaborator says "c" but the strategy reads the suspicion on "d"
    let player = AgentPlayer::new(Arc::new(FixedDecider::voting_for("c", suspect("d", 0.9))));

    let delta = player.decide_vote(&ctx(&state, "a")).await.unwrap();
    assert_eq!(delta.current_votes["a"].target, "d");
    assert!(delta.player_private_states["a"].mindset.suspicions.contains_key("d"));
}

#[tokio::test]
async fn agent_strategy_comes_from_extras() {
    let mut state = table();
    enter_phase(&mut state, Phase::Voting);
    cast(&mut state, "b", "c");
    cast(&mut state, "d", "c");
    let player = AgentPlayer::new(Arc::new(FixedDecider::voting_for("b", suspect("b", 0.9))));

    let mut extras = Extras::new();
    extras.insert(VOTE_STRATEGY_KEY.into(), serde_json::json!("consensus"));
    let consensus_ctx = ctx(&state, "a").with_extras(Arc::new(extras));
    let delta = player.decide_vote(&consensus_ctx).await.unwrap();
    assert_eq!(delta.current_votes["a"].target, "c");

    // default strategy from config is eliminate-prime
    let delta = player.decide_vote(&ctx(&state, "a")).await.unwrap();
    assert_eq!(delta.current_votes["a"].target, "b");
}

#[tokio::test]
async fn agent_survives_collaborator_failure() {
    let mut state = table();
    enter_phase(&mut state, Phase::Voting);
    let player = AgentPlayer::new(Arc::new(FixedDecider::failing()));
    let delta = player.decide_vote(&ctx(&state, "c")).await.unwrap();
    assert_eq!(delta.current_votes["c"].target, "a");
    assert!(delta.player_private_states.is_empty());
}

#[tokio::test]
async fn agent_failure_ignores_prior_suspicions() {
    let mut state = table();
    apply_delta(
        &mut state,
        &StateDelta::default().with_mindset("a", suspect("d", 0.9)),
    )
    .unwrap();
    enter_phase(&mut state, Phase::Voting);

    for strategy in ["eliminate-prime", "consensus", "defensive"] {
        let mut extras = Extras::new();
        extras.insert(VOTE_STRATEGY_KEY.into(), serde_json::json!(strategy));
        let player = AgentPlayer::new(Arc::new(FixedDecider::failing()));
        let delta = player
            .decide_vote(&ctx(&state, "a").with_extras(Arc::new(extras)))
            .await
            .unwrap();
        assert_eq!(delta.current_votes["a"].target, "b", "strategy {strategy}");
    }
}
