#[cfg(test)]
mod common;


#[cfg(test)]
mod seed_tests;

#[cfg(test)]
mod bootstrap_tests;


#[cfg(test)]
mod lawyer_directory_tests;

#[cfg(test)]
mod profile_media_tests;

#[cfg(test)]
mod case_tests;
