use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use odre_core::domain::{PlanDate, ServiceCategory, SongId};

/// Odre Nuevo: repertorio, setlist por fecha y transposición de cifrados.
#[derive(Parser, Debug)]
#[command(name = "odre")]
#[command(version)]
pub struct Cli {
  /// Archivo de configuración alternativo (por defecto, `odre.toml` del sistema)
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Lista el repertorio
  Songs {
    /// Texto a buscar en título o intérprete
    #[arg(long, short)]
    search: Option<String>,

    /// Ritmo o categoría exacta
    #[arg(long, short)]
    rhythm: Option<String>,
  },

  /// Transpone un archivo de cifrado y lo escribe en la salida estándar
  Transpose {
    file: PathBuf,

    #[arg(allow_negative_numbers = true)]
    semitones: i32,
  },

  /// Planes de culto por fecha
  #[command(subcommand)]
  Plan(PlanCommand),
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
  /// Muestra el plan de una fecha
  Show(DateArg),

  /// Añade canciones del repertorio al final del plan
  Add {
    #[command(flatten)]
    date: DateArg,

    /// Ids de canción, en el orden en que se añaden
    #[arg(required = true)]
    song_ids: Vec<SongId>,

    /// Director del culto
    #[arg(long, short)]
    director: Option<String>,

    /// Momento del culto de las canciones añadidas
    #[arg(long, short)]
    category: Option<ServiceCategory>,
  },

  /// Quita la canción en la posición indicada (desde 1)
  Remove {
    #[command(flatten)]
    date: DateArg,

    position: usize,
  },

  /// Mueve una canción de una posición a otra (desde 1)
  Move {
    #[command(flatten)]
    date: DateArg,

    from: usize,
    to: usize,
  },

  /// Borra el plan de una fecha
  Delete(DateArg),

  /// Lista para compartir, agrupada por momento del culto
  Share {
    #[command(flatten)]
    date: DateArg,

    /// Salida en JSON
    #[arg(long)]
    json: bool,
  },
}

#[derive(Args, Debug, Clone)]
pub struct DateArg {
  /// Fecha del culto, `YYYY-MM-DD`
  pub date: PlanDate,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_plan_add() {
    let cli = Cli::try_parse_from([
      "odre", "plan", "add", "2024-05-05", "s1", "s2", "--director", "Juan", "--category", "adoracion",
    ])
    .unwrap();

    let Command::Plan(PlanCommand::Add { date, song_ids, director, category }) = cli.command else {
      panic!("unexpected command");
    };
    assert_eq!(date.date.key(), "2024-05-05");
    assert_eq!(song_ids, [SongId::from("s1"), SongId::from("s2")]);
    assert_eq!(director.as_deref(), Some("Juan"));
    assert_eq!(category, Some(ServiceCategory::Adoracion));
  }

  #[test]
  fn accepts_negative_semitones() {
    let cli = Cli::try_parse_from(["odre", "transpose", "cifrado.txt", "-3"]).unwrap();
    assert!(matches!(cli.command, Command::Transpose { semitones: -3, .. }));
  }

  #[test]
  fn rejects_bad_date() {
    assert!(Cli::try_parse_from(["odre", "plan", "show", "05/05/2024"]).is_err());
    assert!(Cli::try_parse_from(["odre", "plan", "add", "2024-05-05"]).is_err());
  }
}
