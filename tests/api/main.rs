mod helpers;
mod planning;
mod projects;
mod tenant;
