//! Simulation report generation.

use super::runner::RunStats;
use crate::character::class::CharacterClass;
use crate::core::constants::TICKS_PER_SECOND;
use crate::items::types::Rarity;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_survived: u32,
    pub runs_died_on_quest: u32,
    pub runs_timed_out: u32,

    // Aggregated stats
    pub avg_final_level: f64,
    pub avg_peak_level: f64,
    pub avg_rebirths: f64,
    pub avg_bosses_defeated: f64,
    pub avg_boss_deaths: f64,
    pub avg_quests_completed: f64,
    pub avg_final_copper: f64,
    pub avg_final_item_level: f64,
    pub avg_ticks: f64,
    /// Real time a host ticking at the game's rate would need, in hours.
    pub avg_play_hours: f64,

    // Distribution data
    pub level_distribution: BTreeMap<u32, u32>,
    pub quest_deaths_by_class: BTreeMap<String, u32>,

    // Loot analysis
    pub drop_rate: f64,
    pub avg_drops_by_rarity: Vec<(Rarity, f64)>,
    pub avg_auto_sold: f64,
    pub avg_lost_to_full_inventory: f64,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

fn class_label(class: CharacterClass) -> String {
    format!("{:?}", class)
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let runs_died_on_quest = runs.iter().filter(|r| r.died_on_quest).count() as u32;
        let runs_timed_out = runs.iter().filter(|r| r.timed_out).count() as u32;

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.peak_level).or_insert(0) += 1;
        }

        let mut quest_deaths_by_class = BTreeMap::new();
        for run in runs.iter().filter(|r| r.died_on_quest) {
            *quest_deaths_by_class.entry(class_label(run.class)).or_insert(0) += 1;
        }

        let total_rewards: u32 = runs.iter().map(|r| r.loot.total_rewards).sum();
        let total_drops: u32 = runs.iter().map(|r| r.loot.total_drops).sum();
        let drop_rate = if total_rewards == 0 {
            0.0
        } else {
            total_drops as f64 / total_rewards as f64
        };

        let avg_drops_by_rarity = Rarity::all()
            .into_iter()
            .map(|rarity| (rarity, average(&runs, |r| r.loot.drops_of(rarity) as f64)))
            .collect();

        Self {
            num_runs,
            runs_survived: num_runs - runs_died_on_quest,
            runs_died_on_quest,
            runs_timed_out,
            avg_final_level: average(&runs, |r| r.final_level as f64),
            avg_peak_level: average(&runs, |r| r.peak_level as f64),
            avg_rebirths: average(&runs, |r| r.rebirths as f64),
            avg_bosses_defeated: average(&runs, |r| r.bosses_defeated as f64),
            avg_boss_deaths: average(&runs, |r| r.boss_deaths as f64),
            avg_quests_completed: average(&runs, |r| r.quests_completed as f64),
            avg_final_copper: average(&runs, |r| r.final_copper as f64),
            avg_final_item_level: average(&runs, |r| r.final_item_level as f64),
            avg_ticks: average(&runs, |r| r.total_ticks as f64),
            avg_play_hours: average(&runs, |r| r.total_ticks as f64) / TICKS_PER_SECOND / 3600.0,
            level_distribution,
            quest_deaths_by_class,
            drop_rate,
            avg_drops_by_rarity,
            avg_auto_sold: average(&runs, |r| r.loot.auto_sold as f64),
            avg_lost_to_full_inventory: average(&runs, |r| r.loot.lost_to_full_inventory as f64),
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} survived, {} died on a quest, {} timed out\n\n",
            self.num_runs, self.runs_survived, self.runs_died_on_quest, self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:      {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Peak Level:       {:.1}\n", self.avg_peak_level));
        report.push_str(&format!("  Avg Rebirths:         {:.2}\n", self.avg_rebirths));
        report.push_str(&format!("  Avg Quests:           {:.0}\n", self.avg_quests_completed));
        report.push_str(&format!("  Avg Ticks:            {:.0}\n", self.avg_ticks));
        report.push_str(&format!("  Avg Play Time:        {:.1}h\n\n", self.avg_play_hours));

        report.push_str("── BOSSES ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Bosses Defeated:  {:.2}\n", self.avg_bosses_defeated));
        report.push_str(&format!("  Avg Boss Deaths:      {:.2}\n\n", self.avg_boss_deaths));

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Copper:     {:.0}\n", self.avg_final_copper));
        report.push_str(&format!("  Avg Final Item Level: {:.1}\n\n", self.avg_final_item_level));

        report.push_str("── LOOT ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Drop Rate:            {:.1}%\n", self.drop_rate * 100.0));
        for (rarity, avg) in &self.avg_drops_by_rarity {
            report.push_str(&format!("  {:<21} {:.2}\n", format!("{:?}:", rarity), avg));
        }
        report.push_str(&format!("  Avg Auto-Sold:        {:.1}\n", self.avg_auto_sold));
        report.push_str(&format!(
            "  Avg Lost (Full Bag):  {:.1}\n\n",
            self.avg_lost_to_full_inventory
        ));

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let survival_rate = if self.num_runs == 0 {
            0.0
        } else {
            (self.runs_survived as f64 / self.num_runs as f64) * 100.0
        };
        report.push_str(&format!("  Survival Rate:   {:.1}%\n", survival_rate));
        for (class, deaths) in &self.quest_deaths_by_class {
            report.push_str(&format!("  ⚠️  {} died on quests in {} runs\n", class, deaths));
        }
        if self.avg_bosses_defeated < 1.0 && self.runs_survived > 0 {
            report.push_str("  ⚠️  Few bosses defeated - boss item level gates too high?\n");
        }
        if self.avg_lost_to_full_inventory > self.avg_auto_sold * 2.0 {
            report.push_str("  ⚠️  Much loot lost to full inventories\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Histogram of the highest level reached per run.
    pub fn level_curve_text(&self) -> String {
        let mut report = String::new();
        report.push_str("── PEAK LEVEL DISTRIBUTION ──────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:3}: {:>5.1}% {}\n", level, pct, bar));
        }
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::loot_sim::LootStats;
    use super::*;

    fn run(class: CharacterClass, level: u32, died: bool) -> RunStats {
        RunStats {
            class,
            final_level: level,
            peak_level: level,
            rebirths: 1,
            bosses_defeated: 2,
            boss_deaths: 1,
            quests_completed: 40,
            died_on_quest: died,
            final_copper: 1_000,
            final_item_level: 12,
            total_ticks: 5_000,
            timed_out: false,
            loot: LootStats::default(),
        }
    }

    #[test]
    fn test_report_generation() {
        let runs = vec![
            run(CharacterClass::Warrior, 10, false),
            run(CharacterClass::Mage, 15, true),
        ];

        let report = SimReport::from_runs(runs);
        assert_eq!(report.num_runs, 2);
        assert_eq!(report.runs_survived, 1);
        assert!((report.avg_final_level - 12.5).abs() < 0.01);
        assert_eq!(report.quest_deaths_by_class.get("Mage"), Some(&1));
        assert_eq!(report.level_distribution.len(), 2);
    }

    #[test]
    fn test_play_time_follows_tick_rate() {
        let mut long = run(CharacterClass::Warrior, 30, false);
        // One hour at 150 ms per tick.
        long.total_ticks = 24_000;
        let report = SimReport::from_runs(vec![long]);
        assert!((report.avg_play_hours - 1.0).abs() < 1e-9);
        assert!(report.to_text().contains("Avg Play Time:        1.0h"));
    }

    #[test]
    fn test_text_and_json_output() {
        let report = SimReport::from_runs(vec![run(CharacterClass::Rogue, 7, false)]);
        let text = report.to_text();
        assert!(text.contains("SIMULATION REPORT"));
        assert!(report.level_curve_text().contains("Level   7"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"avg_final_level\": 7.0"));
        assert!(!json.contains("run_stats"));
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_runs(Vec::new());
        assert_eq!(report.avg_final_level, 0.0);
        assert!(report.to_text().contains("Survival Rate:   0.0%"));
    }
}
