use montecarlo::defs::{alphabet, coin, d6};
use montecarlo::print::PrintExt;
use montecarlo::{Analyzer, Die, Error, Float, Form, Game, History, Options, TrialTable};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_pcg::Pcg64;

#[test]
fn two_dice_jackpots() {
    let dice = vec![d6(), d6()];
    let table = TrialTable::from_rows([[3, 3], [1, 2], [5, 5]]).unwrap();
    let analyzer = Analyzer::for_table(&dice, &table, Options::default()).unwrap();
    let jackpots = analyzer.jackpot();
    assert_eq!(jackpots.count(), 2);
    assert_eq!(jackpots.trials(), &[1, 3]);
}

#[test]
fn loaded_die_never_shows_six() {
    let mut rng = Pcg64::seed_from_u64(2024);
    let mut die = d6();
    die.set_weight(&6, 0).unwrap();
    assert!(!die.roll_rng(1000, &mut rng).unwrap().contains(&6));

    let mut game = Game::new([die.clone(), die]).unwrap();
    game.run_rng(500, &mut rng).unwrap();
    let analyzer = Analyzer::new(&game).unwrap();
    let counts = analyzer.face_count();
    assert_eq!(counts.totals()[5], 0);
    assert_eq!(counts.totals().iter().sum::<usize>(), 1000);
}

#[test]
fn unfair_coin_game() {
    let mut rng = Pcg64::seed_from_u64(7);
    let fair = coin();
    let mut unfair = coin();
    unfair.set_weight("Heads", 5).unwrap();

    let mut game = Game::new([fair, unfair.clone(), unfair]).unwrap();
    let mut history = History::new();
    history.record(game.run_rng(1000, &mut rng).unwrap());

    let analyzer = Analyzer::new(&game).unwrap();
    let jackpots = analyzer.jackpot();
    let heads = jackpots.faces().iter().filter(|&&f| f == "Heads").count();
    let tails = jackpots.count() - heads;
    assert!(heads > tails);

    let combos = analyzer.combo().unwrap();
    assert_eq!(combos.len(), 4);
    assert_eq!(combos.total(), 1000);
    assert_eq!(analyzer.permutation().unwrap().len(), 8);
    assert_eq!(history.latest(), game.table());
}

#[test]
fn float_faces() {
    let mut rng = Pcg64::seed_from_u64(99);
    let faces = [0.5, 1.0, 1.5].map(Float::from);
    let die = Die::new(faces).unwrap();
    let mut game = Game::new(vec![die; 2]).unwrap();
    game.run_rng(30, &mut rng).unwrap();

    let analyzer = Analyzer::new(&game).unwrap();
    assert_eq!(analyzer.domain().faces(), &faces);
    assert_eq!(analyzer.combo().unwrap().len(), 6);
    assert_eq!(analyzer.permutation().unwrap().len(), 9);
}

#[test]
fn alphabet_words_are_too_many_to_enumerate() {
    let mut rng = Pcg64::seed_from_u64(5);
    let mut game = Game::new(vec![alphabet(); 4]).unwrap();
    game.run_rng(100, &mut rng).unwrap();

    let options = Options::builder().max_outcomes(100_000).build();
    let analyzer = Analyzer::with_options(&game, options).unwrap();
    assert_eq!(analyzer.combo().unwrap().len(), 23_751);
    assert!(matches!(
        analyzer.permutation(),
        Err(Error::TooManyOutcomes { limit: 100_000, .. })
    ));
}

#[test]
fn presenting_and_printing() {
    let mut game = Game::new(vec![d6(); 2]).unwrap();
    game.run(4).unwrap();

    let narrow = game.present("narrow".parse().unwrap()).unwrap();
    assert_eq!(narrow.narrow().map(|t| t.len()), Some(8));
    assert!(narrow.table().contains("face rolled"));

    let form = Form::try_from(7u8);
    assert_eq!(form, Err(Error::InvalidForm("7".to_string())));

    let analyzer = Analyzer::new(&game).unwrap();
    assert!(analyzer.face_count().table().contains("roll number"));
    assert!(d6().table().contains("weights"));
}
