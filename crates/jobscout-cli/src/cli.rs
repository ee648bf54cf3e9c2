//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use jobscout_core::{
    DatePosted, ExperienceLevel, FilterDimension, JobType, RemoteMode, SalaryFloor,
    SearchFilters, SortOrder,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jobscout")]
#[command(about = "Search paginated job listings with filters", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: the user config directory)
    #[arg(long, global = true, env = "JOBSCOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search listings matching the given filters
    Search(SearchArgs),

    /// Fetch the full description of one listing
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Location, e.g. city, state or country
    #[arg(long)]
    pub location: String,

    /// Keywords, e.g. job title or skills
    #[arg(long, default_value = "")]
    pub keyword: String,

    /// Date posted: 24hr, past week, past month
    #[arg(long, default_value = "")]
    pub date_posted: String,

    /// Job type: full time, part time, contract, temporary, internship, volunteer
    #[arg(long, default_value = "")]
    pub job_type: String,

    /// Remote filter: on-site, remote, hybrid
    #[arg(long, default_value = "")]
    pub remote: String,

    /// Experience: internship, entry level, associate, senior, director, executive
    #[arg(long, default_value = "")]
    pub experience: String,

    /// Minimum salary: 40000, 60000, 80000, 100000, 120000
    #[arg(long, default_value = "")]
    pub salary: String,

    /// Sort order: recent, relevant
    #[arg(long, default_value = "")]
    pub sort_by: String,

    /// Page to start from (0 for the first page)
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Maximum number of results (0 for no limit)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Keep only listings that explicitly offer visa sponsorship
    #[arg(long, default_value_t = false)]
    pub need_sponsorship: bool,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl SearchArgs {
    /// Translate the raw arguments into search filters.
    ///
    /// Unrecognized filter labels leave that dimension unconstrained.
    pub fn to_filters(&self) -> jobscout_core::Result<SearchFilters> {
        Ok(SearchFilters::new(self.location.as_str())?
            .with_keyword(self.keyword.trim())
            .with_date_posted(DatePosted::from_label(&self.date_posted))
            .with_job_type(JobType::from_label(&self.job_type))
            .with_remote(RemoteMode::from_label(&self.remote))
            .with_experience(ExperienceLevel::from_label(&self.experience))
            .with_salary(SalaryFloor::from_label(&self.salary))
            .with_sort_by(SortOrder::from_label(&self.sort_by))
            .with_page(self.page)
            .with_limit(self.limit))
    }
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Listing URL as returned by a search
    pub url: String,
}
