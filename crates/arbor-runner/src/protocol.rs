//! Line protocol spoken with the game server: one JSON request per line on
//! the input, one JSON reply per line on the output.

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use arbor_bot::{BotParams, DecisionError, Policy, PolicyContext};
use arbor_core::game::{GameState, StateSnapshot, TurnPhase};
use arbor_core::model::card::Card;
use arbor_core::model::coord::Coord;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Reply sent when no informed decision is available; the server then plays
/// a random legal move for us.
pub const RANDOM_SENTINEL: &str = "RANDOM";

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(rename = "messageID", default)]
    pub message_id: serde_json::Value,
    pub state: StateSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "move")]
    pub reply: MoveReply,
    #[serde(rename = "messageID")]
    pub message_id: serde_json::Value,
}

/// Payload of a reply, shaped per sub-turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MoveReply {
    /// Draw source code, or `0` to acknowledge a game notice.
    Code(u8),
    Placement { card: Card, coord: Coord },
    Discard(Card),
    Sentinel(&'static str),
}

impl MoveReply {
    pub fn random() -> Self {
        MoveReply::Sentinel(RANDOM_SENTINEL)
    }

    pub fn is_random(&self) -> bool {
        matches!(self, MoveReply::Sentinel(RANDOM_SENTINEL))
    }
}

/// Counters reported when the input is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub replies: usize,
    pub random_replies: usize,
    pub skipped_lines: usize,
}

/// Answers requests for one connection with a single policy.
pub struct ProtocolSession {
    policy: Box<dyn Policy>,
    params: BotParams,
    stats: SessionStats,
}

impl ProtocolSession {
    pub fn new(policy: Box<dyn Policy>, params: BotParams) -> Self {
        Self {
            policy,
            params,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Reads requests until end of input, writing one reply per decodable line.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<SessionStats> {
        for line in input.lines() {
            let line = line.context("reading request line")?;
            let Some(response) = self.handle_line(&line) else {
                continue;
            };
            serde_json::to_writer(&mut output, &response).context("encoding reply")?;
            output.write_all(b"\n").context("writing reply")?;
            output.flush().context("flushing reply")?;
        }
        Ok(self.stats)
    }

    /// `None` for blank or undecodable lines, which are logged and skipped.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Request>(line) {
            Ok(request) => Some(self.respond(&request)),
            Err(err) => {
                self.stats.skipped_lines += 1;
                event!(
                    target: "arbor_runner::protocol",
                    Level::WARN,
                    error = %err,
                    "skipping malformed request"
                );
                None
            }
        }
    }

    pub fn respond(&mut self, request: &Request) -> Response {
        let received = Instant::now();
        let reply = self.reply_for(&request.state, received);
        self.stats.replies += 1;
        if reply.is_random() {
            self.stats.random_replies += 1;
        }
        if tracing::enabled!(Level::INFO) {
            event!(
                target: "arbor_runner::protocol",
                Level::INFO,
                message_id = %request.message_id,
                turn = request.state.turn,
                sub_turn = request.state.sub_turn,
                elapsed_ms = received.elapsed().as_secs_f64() * 1000.0,
                reply = ?reply,
                "answered request"
            );
        }
        Response {
            reply,
            message_id: request.message_id.clone(),
        }
    }

    fn reply_for(&mut self, snapshot: &StateSnapshot, received: Instant) -> MoveReply {
        match snapshot.message.as_deref() {
            Some("NEWGAME") => {
                event!(target: "arbor_runner::protocol", Level::INFO, "game started");
                return MoveReply::Code(0);
            }
            Some("ENDGAME") => {
                event!(target: "arbor_runner::protocol", Level::INFO, "game ended");
                return MoveReply::Code(0);
            }
            Some(other) => {
                event!(
                    target: "arbor_runner::protocol",
                    Level::WARN,
                    notice = other,
                    "unrecognised notice"
                );
                return MoveReply::random();
            }
            None => {}
        }

        if !snapshot.active_turn {
            return MoveReply::random();
        }

        let state = match snapshot.restore() {
            Ok(state) => state,
            Err(err) => {
                event!(
                    target: "arbor_runner::protocol",
                    Level::WARN,
                    error = ?err,
                    "state rejected"
                );
                return MoveReply::random();
            }
        };

        match self.decide(&state, received + self.params.search.time_limit) {
            Ok(reply) => reply,
            Err(err) => {
                event!(
                    target: "arbor_runner::protocol",
                    Level::WARN,
                    error = %err,
                    policy = self.policy.name(),
                    "no decision available"
                );
                MoveReply::random()
            }
        }
    }

    fn decide(&mut self, state: &GameState, deadline: Instant) -> Result<MoveReply, DecisionError> {
        let ctx = PolicyContext::new(state, &self.params).with_deadline(deadline);
        match state.phase {
            TurnPhase::FirstDraw | TurnPhase::SecondDraw => {
                Ok(MoveReply::Code(self.policy.choose_draw(&ctx).code()))
            }
            TurnPhase::Place => {
                let (card, coord) = self.policy.choose_placement(&ctx)?;
                Ok(MoveReply::Placement { card, coord })
            }
            TurnPhase::Discard => Ok(MoveReply::Discard(self.policy.choose_discard(&ctx)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_bot::{HeuristicPolicy, RandomPolicy, SearchConfig};
    use serde_json::json;

    fn session() -> ProtocolSession {
        ProtocolSession::new(Box::new(HeuristicPolicy::new()), BotParams::default())
    }

    fn request(state: serde_json::Value) -> String {
        json!({"messageID": "m-1", "state": state}).to_string()
    }

    fn midgame(sub_turn: u8) -> serde_json::Value {
        json!({
            "deck": 20,
            "hand": [["R", 1], ["J", 3], ["R", 4], ["J", 5], ["O", 4], ["J", 4], ["R", 3], ["C", 6], ["M", 1]],
            "discard": [["W", 1]],
            "opponentDiscard": [["C", 5], ["R", 5]],
            "playArea": {"0": {"0": ["W", 2], "1": ["C", 2]}, "1": {"0": ["J", 2]}},
            "opponentPlayArea": {"0": {"0": ["W", 8], "-1": ["R", 2]}, "1": {"0": ["O", 2]}},
            "opponentHand": [null, ["W", 5], ["R", 8], null, null, ["C", 1], ["C", 8]],
            "turn": 12,
            "subTurn": sub_turn
        })
    }

    #[test]
    fn game_notices_are_acknowledged_with_zero() {
        let mut session = session();
        for notice in ["NEWGAME", "ENDGAME"] {
            let line = request(json!({"message": notice}));
            let response = session.handle_line(&line).unwrap();
            assert_eq!(response.reply, MoveReply::Code(0));
            assert_eq!(response.message_id, json!("m-1"));
        }
    }

    #[test]
    fn draw_placement_and_discard_use_the_wire_shapes() {
        let mut session = session();

        let draw = session.handle_line(&request(midgame(0))).unwrap();
        assert!(matches!(draw.reply, MoveReply::Code(code) if code <= 2));

        let place = session.handle_line(&request(midgame(2))).unwrap();
        let encoded = serde_json::to_value(&place).unwrap();
        assert!(encoded["move"]["card"].is_array());
        assert_eq!(encoded["move"]["coord"].as_array().unwrap().len(), 2);
        assert_eq!(encoded["messageID"], json!("m-1"));

        let discard = session.handle_line(&request(midgame(3))).unwrap();
        let MoveReply::Discard(card) = discard.reply else {
            panic!("expected a discard, got {:?}", discard.reply);
        };
        let hand: Vec<Card> = serde_json::from_value(midgame(3)["hand"].clone()).unwrap();
        assert!(hand.contains(&card));
    }

    #[test]
    fn inactive_turns_and_bad_states_answer_random() {
        let mut session = session();

        let mut inactive = midgame(2);
        inactive["activeTurn"] = json!(false);
        let response = session.handle_line(&request(inactive)).unwrap();
        assert!(response.reply.is_random());

        let mut duplicated = midgame(2);
        duplicated["discard"] = json!([["R", 1]]);
        let response = session.handle_line(&request(duplicated)).unwrap();
        assert!(response.reply.is_random());

        let mut bad_sub_turn = midgame(2);
        bad_sub_turn["subTurn"] = json!(7);
        let response = session.handle_line(&request(bad_sub_turn)).unwrap();
        assert!(response.reply.is_random());

        let empty_hand = json!({"deck": 10, "subTurn": 2});
        let response = session.handle_line(&request(empty_hand)).unwrap();
        assert!(response.reply.is_random());
        assert_eq!(session.stats().random_replies, 4);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let input = format!(
            "not json\n\n{}\n{{\"messageID\": 3}}\n{}\n",
            request(json!({"message": "NEWGAME"})),
            request(midgame(1)),
        );
        let mut output = Vec::new();
        let mut session = ProtocolSession::new(
            Box::new(RandomPolicy::with_seed(8)),
            BotParams {
                search: SearchConfig::for_testing(10),
                ..BotParams::default()
            },
        );
        let stats = session.run(input.as_bytes(), &mut output).unwrap();

        assert_eq!(stats.replies, 2);
        assert_eq!(stats.skipped_lines, 2);
        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["move"], json!(0));
        assert!(lines[1]["move"].as_u64().unwrap() <= 2);
    }

    #[test]
    fn numeric_message_ids_are_echoed() {
        let mut session = session();
        let line = json!({"messageID": 42, "state": {"message": "NEWGAME"}}).to_string();
        let response = session.handle_line(&line).unwrap();
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"move":0,"messageID":42}"#
        );
    }
}
