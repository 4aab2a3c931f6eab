//! Integration tests for the Stead rules engine.
//!
//! These drive complete flows - setup draft, dice, robber, builds - through
//! the same click dispatch the UI uses.

use std::cell::Cell as StdCell;
use std::collections::HashMap;
use std::rc::Rc;

use stead_core::*;

fn fixed_game(players: u8) -> Game {
    Game::new(GameConfig {
        players,
        first_player: 1,
        seed: Some(42),
    })
    .unwrap()
}

fn first_selectable_node(game: &Game) -> NodeId {
    NodeId(
        game.board()
            .nodes()
            .iter()
            .position(|n| n.selectable)
            .expect("a selectable node"),
    )
}

fn last_selectable_node(game: &Game) -> NodeId {
    NodeId(
        game.board()
            .nodes()
            .iter()
            .rposition(|n| n.selectable)
            .expect("a selectable node"),
    )
}

fn first_selectable_connector(game: &Game) -> ConnectorId {
    ConnectorId(
        game.board()
            .connectors()
            .iter()
            .position(|c| c.selectable)
            .expect("a selectable connector"),
    )
}

/// Drive the whole setup draft. Player 1 packs toward the low node indices
/// (the board center), everyone else spreads from the far end. Returns the
/// seat order in which villages were placed.
fn complete_setup(game: &mut Game) -> Vec<PlayerId> {
    let mut placers = Vec::new();
    let mut guard = 0;
    while matches!(game.phase(), Phase::SetupVillage | Phase::SetupRoad) {
        match game.phase() {
            Phase::SetupVillage => {
                let seat = game.current_player();
                placers.push(seat);
                let node = if seat == 1 {
                    first_selectable_node(game)
                } else {
                    last_selectable_node(game)
                };
                assert!(game.handle_click(ClickTarget::Node(node)));
            }
            _ => {
                let connector = first_selectable_connector(game);
                assert!(game.handle_click(ClickTarget::Connector(connector)));
            }
        }
        guard += 1;
        assert!(guard < 100, "setup draft did not terminate");
    }
    placers
}

/// Hand a player an exact bundle of cards.
fn deal(game: &mut Game, player: PlayerId, cards: &[(Resource, u32)]) {
    for &(resource, count) in cards {
        for _ in 0..count {
            game.draw_card(player, resource);
        }
    }
}

#[test]
fn four_player_setup_runs_the_snake_and_lands_on_turn() {
    let mut game = fixed_game(4);
    let placers = complete_setup(&mut game);

    // Snake draft from first player 1: ascending then descending.
    assert_eq!(placers, vec![1, 2, 3, 4, 4, 3, 2, 1]);

    assert_eq!(game.phase(), Phase::Turn);
    assert_eq!(game.turn(), 0);
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.action(), PendingAction::RollDice);

    for player in game.players() {
        assert_eq!(player.villages_remaining, 3);
        assert_eq!(player.roads_remaining, 13);
        assert!(player.setup_node.is_none());
    }
}

#[test]
fn setup_visits_every_seat_twice_for_all_player_counts() {
    for players in 2..=6u8 {
        let mut game = fixed_game(players);
        let placers = complete_setup(&mut game);

        assert_eq!(placers.len(), 2 * players as usize);
        for seat in 1..=players {
            let visits = placers.iter().filter(|&&p| p == seat).count();
            assert_eq!(visits, 2, "seat {seat} of {players}");
        }
        assert_eq!(game.phase(), Phase::Turn);
    }
}

#[test]
fn board_ownership_mirrors_piece_pools() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    for player in game.players() {
        let villages_on_board = game
            .board()
            .nodes()
            .iter()
            .filter(|n| n.owner == Some(player.id))
            .count() as u32;
        let roads_on_board = game
            .board()
            .connectors()
            .iter()
            .filter(|c| c.owner == Some(player.id))
            .count() as u32;

        assert_eq!(villages_on_board, player.villages_placed());
        assert_eq!(roads_on_board, player.roads_placed());
        assert_eq!(player.villages_placed() + player.villages_remaining, 5);
        assert_eq!(player.roads_placed() + player.roads_remaining, 15);
    }
}

#[test]
fn village_build_outside_setup_pays_the_fixed_cost() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    // Two roads out from an owned village, then the village at the far end.
    deal(
        &mut game,
        1,
        &[
            (Resource::Wood, 3),
            (Resource::Brick, 3),
            (Resource::Wheat, 1),
            (Resource::Sheep, 1),
        ],
    );

    let road_one = (0..game.board().connectors().len())
        .map(ConnectorId)
        .find(|&c| game.can_build_road(c))
        .expect("a legal first road");
    assert!(game.handle_click(ClickTarget::Connector(road_one)));
    assert_eq!(game.player(1).roads_remaining, 12);
    assert_eq!(game.player(1).hand.count(Resource::Wood), 2);
    assert_eq!(game.player(1).hand.count(Resource::Brick), 2);

    let road_two = (0..game.board().connectors().len())
        .map(ConnectorId)
        .find(|&c| game.can_build_road(c))
        .expect("a legal second road");
    assert!(game.handle_click(ClickTarget::Connector(road_two)));

    let site = (0..game.board().nodes().len())
        .map(NodeId)
        .find(|&n| game.can_build_village(n))
        .expect("a legal village site");

    // The exact village cost must be present immediately before the build.
    assert!(game
        .player(1)
        .hand
        .has_cards(&ResourceSet::with_amounts(1, 1, 1, 1, 0)));
    let wood_before = game.player(1).hand.count(Resource::Wood);
    let brick_before = game.player(1).hand.count(Resource::Brick);
    let wheat_before = game.player(1).hand.count(Resource::Wheat);
    let sheep_before = game.player(1).hand.count(Resource::Sheep);

    assert!(game.handle_click(ClickTarget::Node(site)));

    assert_eq!(game.player(1).villages_remaining, 2);
    assert_eq!(game.player(1).hand.count(Resource::Wood), wood_before - 1);
    assert_eq!(game.player(1).hand.count(Resource::Brick), brick_before - 1);
    assert_eq!(game.player(1).hand.count(Resource::Wheat), wheat_before - 1);
    assert_eq!(game.player(1).hand.count(Resource::Sheep), sheep_before - 1);
}

#[test]
fn a_built_road_cannot_be_built_again() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    deal(&mut game, 1, &[(Resource::Wood, 2), (Resource::Brick, 2)]);

    let road = (0..game.board().connectors().len())
        .map(ConnectorId)
        .find(|&c| game.can_build_road(c))
        .expect("a legal road");
    assert!(game.build_road(road));

    // Same connector, same query: now owned, so never legal again.
    assert!(!game.can_build_road(road));
    assert!(!game.build_road(road));
    assert_eq!(game.player(1).roads_remaining, 12);
}

#[test]
fn owned_siblings_block_villages_in_every_phase() {
    let mut game = fixed_game(4);

    // Player 1's first village.
    let village = first_selectable_node(&game);
    assert!(game.handle_click(ClickTarget::Node(village)));
    let sibling = game.board().node(village).siblings()[0];

    // Player 1 is placing the matching road; the sibling is not selectable
    // and stays illegal for everyone through the rest of the draft.
    assert!(!game.can_build_village(sibling));
    let connector = first_selectable_connector(&game);
    assert!(game.handle_click(ClickTarget::Connector(connector)));
    assert_eq!(game.current_player(), 2);
    assert!(!game.can_build_village(sibling));
    assert!(!game.board().node(sibling).selectable);

    // Even with a full hand and an adjacent road in the turn phase the
    // sibling rule holds.
    complete_setup(&mut game);
    deal(
        &mut game,
        1,
        &[
            (Resource::Wood, 2),
            (Resource::Brick, 2),
            (Resource::Wheat, 2),
            (Resource::Sheep, 2),
        ],
    );
    assert!(!game.can_build_village(sibling));

    // And through the robber phases, where nothing is buildable at all.
    game.resolve_dice(3, 4);
    assert!((0..game.board().nodes().len())
        .map(NodeId)
        .all(|n| !game.can_build_village(n)));
}

#[test]
fn rolling_seven_engages_the_robber_before_any_distribution() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    deal(&mut game, 2, &[(Resource::Wood, 8)]);
    let sizes_before: Vec<usize> = game.players().iter().map(|p| p.hand.len()).collect();

    game.resolve_dice(3, 4);

    assert_eq!(game.phase(), Phase::RobberDiscard);
    let sizes_after: Vec<usize> = game.players().iter().map(|p| p.hand.len()).collect();
    assert_eq!(sizes_before, sizes_after, "a seven never pays out");
}

#[test]
fn eight_card_hand_is_forced_through_discard_selection() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    deal(&mut game, 2, &[(Resource::Wood, 5), (Resource::Sheep, 3)]);
    game.resolve_dice(5, 2);

    // Player 1 holds nothing and is skipped; the queue stops on player 2.
    assert_eq!(game.phase(), Phase::RobberDiscard);
    assert_eq!(game.current_player(), 2);
    assert_eq!(game.action(), PendingAction::SelectCards);

    // Selecting exactly half the hand (rounded down) arms the discard...
    let hand: Vec<CardId> = game.player(2).hand.cards().iter().map(|c| c.id).collect();
    for &card in &hand[..3] {
        assert!(game.toggle_card(card));
        assert_eq!(game.action(), PendingAction::SelectCards);
    }
    assert!(game.toggle_card(hand[3]));
    assert_eq!(game.action(), PendingAction::DiscardCards);

    // ...deselecting flips it back...
    assert!(game.toggle_card(hand[3]));
    assert_eq!(game.action(), PendingAction::SelectCards);
    assert!(game.toggle_card(hand[3]));
    assert_eq!(game.action(), PendingAction::DiscardCards);

    // ...and confirming sheds exactly that half.
    assert!(game.handle_click(ClickTarget::Control));
    assert_eq!(game.player(2).hand.len(), 4);

    // Nobody else is over the threshold, so placement begins with the roller.
    assert_eq!(game.phase(), Phase::RobberPlace);
    assert_eq!(game.action(), PendingAction::PlaceRobber);
    assert_eq!(game.current_player(), 1);
}

#[test]
fn robber_placement_must_change_cells_and_returns_to_the_turn() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);
    game.resolve_dice(3, 4);
    assert_eq!(game.phase(), Phase::RobberPlace);

    let old_seat = game.board().robber();
    assert!(!game.handle_click(ClickTarget::Cell(old_seat)), "must differ");

    let target = CellId(
        game.board()
            .cells()
            .iter()
            .position(|c| c.selectable)
            .expect("a selectable cell"),
    );
    assert!(game.handle_click(ClickTarget::Cell(target)));

    assert!(!game.board().cell(old_seat).has_robber);
    assert!(game.board().cell(target).has_robber);
    assert_eq!(game.board().robber(), target);
    assert_eq!(game.phase(), Phase::Turn);
    assert_eq!(game.action(), PendingAction::NextTurn);
    assert_eq!(game.current_player(), 1);
}

#[test]
fn distribution_grants_one_card_per_owned_adjacent_village() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    // Work out who should be paid for a nine before rolling it.
    let mut expected: HashMap<(PlayerId, Resource), u32> = HashMap::new();
    for cell in game.board().cells() {
        if cell.roll != Some(9) || cell.has_robber {
            continue;
        }
        let resource = cell.terrain.resource().unwrap();
        for &node in cell.nodes() {
            if let Some(owner) = game.board().node(node).owner {
                *expected.entry((owner, resource)).or_insert(0) += 1;
            }
        }
    }
    // Player 1 packed the board center, which touches the ore nine.
    assert!(expected.contains_key(&(1, Resource::Ore)));

    game.resolve_dice(4, 5);

    assert_eq!(game.phase(), Phase::Turn);
    assert_eq!(game.action(), PendingAction::NextTurn);
    for player in game.players() {
        for resource in Resource::ALL {
            let want = expected.get(&(player.id, resource)).copied().unwrap_or(0);
            assert_eq!(
                player.hand.count(resource),
                want,
                "player {} {resource}",
                player.id
            );
        }
    }
}

#[test]
fn ending_the_turn_hands_the_dice_to_the_next_player() {
    let mut game = fixed_game(4);
    complete_setup(&mut game);

    game.resolve_dice(2, 3);
    assert!(game.handle_click(ClickTarget::Control));

    assert_eq!(game.turn(), 1);
    assert_eq!(game.current_player(), 2);
    assert_eq!(game.action(), PendingAction::RollDice);
    assert!(game.dice().is_none());
}

#[test]
fn signals_announce_ownership_and_player_changes() {
    let mut game = fixed_game(4);

    let node_changes = Rc::new(StdCell::new(0u32));
    {
        let node_changes = Rc::clone(&node_changes);
        game.signals().nodes.subscribe(move |_| {
            node_changes.set(node_changes.get() + 1);
            true
        });
    }
    let turn_handovers = Rc::new(StdCell::new(0u32));
    {
        let turn_handovers = Rc::clone(&turn_handovers);
        game.signals().game.subscribe(move |change| {
            if matches!(change, GameChange::CurrentPlayer(_)) {
                turn_handovers.set(turn_handovers.get() + 1);
            }
            false
        });
    }

    complete_setup(&mut game);

    // Every placement claims a node and flips highlights around it.
    assert!(node_changes.get() > 0);
    // The snake hands the draft across all four seats and back.
    assert!(turn_handovers.get() >= 6);
}

#[test]
fn drawn_cards_are_announced_for_ui_wiring() {
    let mut game = fixed_game(2);

    let announced: Rc<StdCell<Option<CardId>>> = Rc::new(StdCell::new(None));
    {
        let announced = Rc::clone(&announced);
        game.signals().players.subscribe(move |change| {
            if let PlayerChange::CardDrawn { card, .. } = change {
                announced.set(Some(*card));
            }
            true
        });
    }

    let card = game.draw_card(1, Resource::Wheat);
    assert_eq!(announced.get(), Some(card));
    assert_eq!(game.player(1).hand.count(Resource::Wheat), 1);
}
