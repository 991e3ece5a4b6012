// Candidate intelligence: skill-gap analysis, job-fit prediction and recruiter ranking.
// Pure functions over a CandidateProfile; handlers load and persist around them.

pub mod catalog;
pub mod handlers;
pub mod job_fit;
pub mod ranking;
pub mod skill_gap;
